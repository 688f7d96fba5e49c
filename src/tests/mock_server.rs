// In-process mock of the transcription server
//
// Serves `POST /upload-and-process` and `GET /job-result/{key}` with
// scripted replies, and records what it received.

use actix_multipart::Multipart;
use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::{web, App, HttpResponse, HttpServer};
use futures::{StreamExt, TryStreamExt};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// One scripted reply of the job result endpoint
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(u16),
    /// 200 with a body that is not JSON
    Garbled(&'static str),
}

impl Reply {
    pub fn processing() -> Self {
        Reply::Json(json!({ "status": "processing", "data": null }))
    }

    pub fn completed(txt: &str, vtt: &str) -> Self {
        Reply::Json(json!({ "status": "completed", "data": { "txt": txt, "vtt": vtt } }))
    }

    pub fn completed_txt_only(txt: &str) -> Self {
        Reply::Json(json!({ "status": "completed", "data": { "txt": txt } }))
    }

    pub fn failed(detail: &str) -> Self {
        Reply::Json(json!({ "status": "failed", "data": detail }))
    }
}

/// Shared state of the mock server
#[derive(Default)]
pub struct MockState {
    /// Text fields of each upload, plus `file_name` and `file_size`
    uploads: Mutex<Vec<HashMap<String, String>>>,
    /// Scripts handed to successive uploads
    pending_scripts: Mutex<VecDeque<Vec<Reply>>>,
    /// Remaining replies per job key
    scripts: Mutex<HashMap<String, VecDeque<Reply>>>,
    /// Forced status for every upload
    upload_status: Mutex<Option<u16>>,
    polls: AtomicUsize,
    next_id: AtomicUsize,
}

impl MockState {
    /// Queues the poll replies of the next upload
    pub fn script_next_job(&self, replies: Vec<Reply>) {
        self.pending_scripts.lock().unwrap().push_back(replies);
    }

    pub fn fail_uploads_with(&self, status: u16) {
        *self.upload_status.lock().unwrap() = Some(status);
    }

    pub fn uploads(&self) -> Vec<HashMap<String, String>> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

pub struct MockServer {
    pub base_url: String,
    pub state: web::Data<MockState>,
    handle: ServerHandle,
}

impl MockServer {
    pub async fn start() -> Self {
        let state = web::Data::new(MockState::default());
        let app_state = state.clone();

        let server = HttpServer::new(move || {
            App::new()
                .app_data(app_state.clone())
                .route("/upload-and-process", web::post().to(upload_and_process))
                .route("/job-result/{key}", web::get().to(job_result))
        })
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .expect("Failed to bind mock server");

        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        Self {
            base_url: format!("http://{}", addr),
            state,
            handle,
        }
    }

    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}

async fn upload_and_process(mut form: Multipart, state: web::Data<MockState>) -> HttpResponse {
    let mut fields = HashMap::new();

    while let Ok(Some(mut field)) = form.try_next().await {
        let content_disposition = field.content_disposition();
        let field_name = content_disposition
            .and_then(|cd| cd.get_name().map(|name| name.to_string()))
            .unwrap_or_default();
        let file_name = content_disposition
            .and_then(|cd| cd.get_filename().map(|name| name.to_string()));

        let mut data = Vec::new();
        while let Some(Ok(chunk)) = field.next().await {
            data.extend_from_slice(&chunk);
        }

        if field_name == "file" {
            fields.insert("file_name".to_string(), file_name.unwrap_or_default());
            fields.insert("file_size".to_string(), data.len().to_string());
        } else {
            fields.insert(field_name, String::from_utf8_lossy(&data).into_owned());
        }
    }
    state.uploads.lock().unwrap().push(fields);

    if let Some(code) = *state.upload_status.lock().unwrap() {
        return HttpResponse::build(StatusCode::from_u16(code).unwrap()).finish();
    }

    let id = state.next_id.fetch_add(1, Ordering::SeqCst) + 1;
    let key = format!("job-{}", id);
    let script = state
        .pending_scripts
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_default();
    state
        .scripts
        .lock()
        .unwrap()
        .insert(key.clone(), script.into());

    HttpResponse::Ok().json(json!({ "key": key }))
}

async fn job_result(path: web::Path<String>, state: web::Data<MockState>) -> HttpResponse {
    state.polls.fetch_add(1, Ordering::SeqCst);
    let key = path.into_inner();

    let reply = {
        let mut scripts = state.scripts.lock().unwrap();
        match scripts.get_mut(&key) {
            Some(script) => script.pop_front().unwrap_or_else(Reply::processing),
            None => Reply::Status(404),
        }
    };

    match reply {
        Reply::Json(body) => HttpResponse::Ok().json(body),
        Reply::Garbled(body) => HttpResponse::Ok().content_type("text/html").body(body),
        Reply::Status(code) => HttpResponse::build(StatusCode::from_u16(code).unwrap())
            .json(json!({ "detail": "scripted error" })),
    }
}
