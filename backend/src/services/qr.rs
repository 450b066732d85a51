//! Stateless QR endpoint: `GET /api/qr?size=<px>&data=<payload>` returns
//! a PNG. The editor and the live preview use it for on-screen QR
//! placeholders; exports render their codes in-process.

use std::io::Cursor;

use actix_web::web::{get, scope};
use actix_web::{web, HttpResponse, Responder, Scope};
use serde::Deserialize;

use crate::render::qr::qr_image;

const MAX_SIDE: u32 = 2048;

#[derive(Deserialize)]
pub struct QrQuery {
    #[serde(default = "default_size")]
    pub size: u32,
    pub data: String,
}

fn default_size() -> u32 {
    150
}

pub fn configure_routes() -> Scope {
    scope("/api/qr").route("", get().to(process))
}

pub async fn process(query: web::Query<QrQuery>) -> impl Responder {
    let side = query.size.clamp(32, MAX_SIDE);
    let img = match qr_image(&query.data, side) {
        Ok(img) => img,
        Err(e) => return HttpResponse::BadRequest().body(format!("QR error: {}", e)),
    };

    let mut bytes = Vec::new();
    if let Err(e) = image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
    {
        return HttpResponse::InternalServerError().body(format!("PNG encode error: {}", e));
    }
    HttpResponse::Ok().content_type("image/png").body(bytes)
}
