pub mod batch;
pub mod field;
pub mod fonts;
pub mod record;
pub mod template;
