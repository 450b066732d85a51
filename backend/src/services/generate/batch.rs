//! # Batch Generation Service
//!
//! `POST /api/generate/batch` accepts a multipart payload — a `json` part
//! (`StartBatchRequest`) followed by a `file` part (the recipient roster)
//! — parses the roster up front, schedules a background job, and returns
//! the job id immediately so the client can poll
//! `GET /api/generate/status/{job_id}`.
//!
//! The job itself runs on a blocking thread and folds over the rows
//! **strictly sequentially**: each row runs the full render→export→
//! upload→record pipeline before the next row starts, and progress is
//! pushed through the job-controller channel after every row. A failing
//! row is caught, recorded in the report, and the batch continues; the
//! final `Completed` status carries the JSON `BatchReport`.

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use common::jobs::JobStatus;
use common::model::batch::BatchReport;
use common::model::field::Field;
use common::model::template::Template;
use common::requests::{BatchStartResponse, ContactInfo, StartBatchRequest};
use futures_util::StreamExt;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::job_controller::state::{JobUpdate, JobsState};
use crate::services::generate::roster::{contact_for_row, map_row_values, parse_roster, RosterRow};
use crate::services::generate::single::{generate_certificate, GenerateOutcome};
use crate::services::templates::fetch_template;
use crate::services::{part_name, read_part_bytes};
use crate::db;

pub(crate) async fn process(state: web::Data<JobsState>, payload: Multipart) -> impl Responder {
    match start_batch(state, payload).await {
        Ok((job_id, total)) => HttpResponse::Ok().json(BatchStartResponse { job_id, total }),
        Err(e) => HttpResponse::BadRequest().body(e),
    }
}

async fn start_batch(
    state: web::Data<JobsState>,
    mut payload: Multipart,
) -> Result<(String, usize), String> {
    let mut request: Option<StartBatchRequest> = None;
    let mut rows: Option<Vec<RosterRow>> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| e.to_string())?;
        match part_name(&field).as_deref() {
            Some("json") => {
                let bytes = read_part_bytes(&mut field).await?;
                request = Some(serde_json::from_slice(&bytes).map_err(|e| e.to_string())?);
            }
            Some("file") => {
                if request.is_none() {
                    return Err("The json part must be sent before the file".to_string());
                }
                let bytes = read_part_bytes(&mut field).await?;
                rows = Some(parse_roster(&bytes)?);
            }
            _ => {}
        }
    }

    let request = request.ok_or("Missing json part")?;
    let rows = rows.ok_or("Missing roster file")?;

    let template = {
        let conn = db::open().map_err(|e| e.to_string())?;
        fetch_template(&conn, &request.template_id)?
    };

    schedule_batch_job(state, template, rows, request.contact).await
}

/// Register the job as `Pending`, spawn the worker, and hand the id back.
async fn schedule_batch_job(
    state: web::Data<JobsState>,
    template: Template,
    rows: Vec<RosterRow>,
    contact: ContactInfo,
) -> Result<(String, usize), String> {
    let job_id = Uuid::new_v4().to_string();
    let total = rows.len();
    state
        .jobs
        .write()
        .await
        .insert(job_id.clone(), JobStatus::Pending);

    let tx = state.tx.clone();
    let job_id_clone = job_id.clone();

    tokio::spawn(async move {
        let tx_block = tx.clone();
        let job_id_for_blocking = job_id_clone.clone();
        let handle = tokio::task::spawn_blocking(move || {
            batch_blocking(tx_block, &job_id_for_blocking, template, rows, contact)
        });

        let status = match handle.await {
            Ok(Ok(report)) => match serde_json::to_string(&report) {
                Ok(payload) => JobStatus::Completed(payload),
                Err(e) => JobStatus::Failed(format!("Report serialization failed: {}", e)),
            },
            Ok(Err(e)) => JobStatus::Failed(e),
            Err(e) => JobStatus::Failed(format!("Task join error: {}", e)),
        };
        let _ = tx
            .send(JobUpdate {
                job_id: job_id_clone,
                status,
            })
            .await;
    });

    Ok((job_id, total))
}

/// The synchronous worker: one DB connection, one row at a time.
fn batch_blocking(
    tx: mpsc::Sender<JobUpdate>,
    job_id: &str,
    template: Template,
    rows: Vec<RosterRow>,
    contact: ContactInfo,
) -> Result<BatchReport, String> {
    let conn = db::open().map_err(|e| e.to_string())?;
    let _ = tx.blocking_send(JobUpdate {
        job_id: job_id.to_string(),
        status: JobStatus::InProgress {
            current: 0,
            total: rows.len() as u32,
        },
    });

    let report = run_batch(
        &rows,
        &template.fields,
        &contact,
        |_row, values, row_contact| {
            match generate_certificate(&conn, &template, values, &row_contact, true)? {
                GenerateOutcome::Persisted { record_id, .. } => Ok(record_id),
                GenerateOutcome::Download { .. } => {
                    Err("Batch rows must persist their output".to_string())
                }
            }
        },
        |current, total| {
            let _ = tx.blocking_send(JobUpdate {
                job_id: job_id.to_string(),
                status: JobStatus::InProgress {
                    current: current as u32,
                    total: total as u32,
                },
            });
        },
    );

    log::info!("batch {}: {}", job_id, report.summary());
    Ok(report)
}

/// Fold the roster through the per-row generator. Rows run in order, one
/// at a time; failures are accumulated, not fatal; `on_progress` fires
/// after every row, successful or not.
pub(crate) fn run_batch<F, P>(
    rows: &[RosterRow],
    fields: &[Field],
    default_contact: &ContactInfo,
    mut generate_row: F,
    mut on_progress: P,
) -> BatchReport
where
    F: FnMut(&RosterRow, std::collections::HashMap<String, String>, ContactInfo) -> Result<String, String>,
    P: FnMut(usize, usize),
{
    let total = rows.len();
    let mut report = BatchReport::new(total);
    for row in rows {
        let values = map_row_values(fields, row);
        let row_contact = contact_for_row(row, default_contact);
        match generate_row(row, values, row_contact) {
            Ok(record_id) => report.record_success(record_id),
            Err(message) => {
                log::warn!("batch row {} failed: {}", row.index, message);
                report.record_failure(row.index, message);
            }
        }
        on_progress(report.processed(), total);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema_on;
    use crate::services::generate::single::persist_document;
    use rusqlite::Connection;
    use std::collections::HashMap;

    fn award_template() -> Template {
        let mut template = Template {
            id: "t1".to_string(),
            name: "Excellence Award".to_string(),
            image_url: None,
            fields: Vec::new(),
            created_at: None,
        };
        template.add_field("f1", "Recipient Name");
        template.add_field("f2", "Category");
        template
    }

    #[test]
    fn rows_without_a_category_column_fall_back_to_default() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema_on(&conn).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let template = award_template();

        let rows = parse_roster(
            b"Recipient Name,Category\nAda,Innovation\nGrace,\nEdsger,Research\n",
        )
        .unwrap();

        let mut n = 0usize;
        let report = run_batch(
            &rows,
            &template.fields,
            &ContactInfo::default(),
            |_, values, contact| {
                n += 1;
                let id = format!("00000000-0000-0000-0000-00000000000{}", n);
                persist_document(&conn, dir.path(), &template, &values, &contact, &id, b"%PDF")
                    .map(|(record_id, _)| record_id)
            },
            |_, _| {},
        );

        assert_eq!(report.succeeded, 3);
        assert_eq!(report.failed, 0);
        let categories: Vec<String> = conn
            .prepare("SELECT category FROM generated_certificates ORDER BY id")
            .unwrap()
            .query_map([], |r| r.get(0))
            .unwrap()
            .map(Result::unwrap)
            .collect();
        assert_eq!(categories, vec!["Innovation", "Default", "Research"]);
    }

    #[test]
    fn a_failing_row_is_recorded_and_the_batch_continues() {
        let template = award_template();
        let rows = parse_roster(b"Recipient Name\nAda\nGrace\nEdsger\n").unwrap();

        let mut progress = Vec::new();
        let report = run_batch(
            &rows,
            &template.fields,
            &ContactInfo::default(),
            |row, values, _| {
                if row.index == 2 {
                    Err("render exploded".to_string())
                } else {
                    Ok(format!("rec-{}", values["f1"]))
                }
            },
            |current, total| progress.push((current, total)),
        );

        assert_eq!(report.total, 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failures[0].row, 2);
        assert_eq!(report.record_ids, vec!["rec-Ada", "rec-Edsger"]);
        // Progress advanced after every row, failure included.
        assert_eq!(progress, vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[test]
    fn per_row_contact_overrides_the_session_default() {
        let template = award_template();
        let rows = parse_roster(b"Recipient Name,Email\nAda,ada@x.org\nGrace,\n").unwrap();
        let default = ContactInfo {
            email: "default@x.org".to_string(),
            phone: "123".to_string(),
        };

        let mut seen: Vec<ContactInfo> = Vec::new();
        run_batch(
            &rows,
            &template.fields,
            &default,
            |_, _values: HashMap<String, String>, contact| {
                seen.push(contact);
                Ok("id".to_string())
            },
            |_, _| {},
        );
        assert_eq!(seen[0].email, "ada@x.org");
        assert_eq!(seen[1].email, "default@x.org");
        assert_eq!(seen[0].phone, "123");
    }
}
