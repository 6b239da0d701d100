//! HTTP server for the dashboard
//!
//! `topiclens serve` → loads the bundle, starts the server, renders the
//! dashboard on every request

use crate::bundle::ResultBundle;
use crate::render::{self, PageParams, RawQuery};
use crate::{loader, vis};
use serde::Serialize;
use std::io;
use tiny_http::{Header, Method, Request, Response, Server};

/// File name the visualization download arrives under.
pub const DOWNLOAD_FILE_NAME: &str = "lda_visualization.html";

#[derive(Serialize)]
struct ApiResponse<T> {
    ok: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Start the dashboard server. The bundle is loaded (and memoized) up
/// front; any fatal load error aborts before the socket opens.
pub fn start(port: u16) -> io::Result<()> {
    let bundle = loader::load()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;

    let addr = format!("127.0.0.1:{}", port);
    let server = Server::http(&addr)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    let url = format!("http://localhost:{}", port);

    eprintln!("\n\x1b[1;34m\u{1F4CA} topiclens\x1b[0m");
    eprintln!("   Dashboard: {}", url);
    eprintln!(
        "   Bundle: {} documents, {} topics",
        bundle.dataset.len(),
        bundle.lda_best_model.num_topics()
    );
    eprintln!("   Press Ctrl+C to stop\n");

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, bundle) {
            eprintln!("Error: {}", e);
        }
    }

    Ok(())
}

fn handle_request(request: Request, bundle: &'static ResultBundle) -> io::Result<()> {
    let url = request.url().to_string();
    let mut parts = url.splitn(2, '?');
    let path = parts.next().unwrap_or("/");
    let query = parts.next().unwrap_or("");
    let method = request.method().clone();

    match (&method, path) {
        // The dashboard: full re-render from the cached bundle per request
        (&Method::Get, "/") => {
            let raw: RawQuery = serde_urlencoded::from_str(query).unwrap_or_default();
            let params = PageParams::from_query(&raw, bundle.dataset.len());
            let vis_error = vis::prepared(bundle).err().map(|e| e.to_string());
            let vis_status = match &vis_error {
                None => Ok(()),
                Some(message) => Err(message.as_str()),
            };
            let html = render::render_page(bundle, &params, vis_status);

            let response = Response::from_string(html).with_header(
                Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=utf-8"[..]).unwrap(),
            );
            request.respond(response)
        }

        // Inline visualization document (iframe target)
        (&Method::Get, "/vis") => match vis::prepared(bundle) {
            Ok(html) => {
                let response = Response::from_string(html).with_header(
                    Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=utf-8"[..])
                        .unwrap(),
                );
                request.respond(response)
            }
            Err(e) => {
                let response = Response::from_string(format!("visualization unavailable: {}", e))
                    .with_status_code(500);
                request.respond(response)
            }
        },

        // Same bytes as /vis, offered as a file download
        (&Method::Get, "/download/lda_visualization.html") => match vis::prepared(bundle) {
            Ok(html) => {
                let response = Response::from_string(html)
                    .with_header(
                        Header::from_bytes(&b"Content-Type"[..], &b"text/html"[..]).unwrap(),
                    )
                    .with_header(
                        Header::from_bytes(
                            &b"Content-Disposition"[..],
                            format!("attachment; filename=\"{}\"", DOWNLOAD_FILE_NAME).as_bytes(),
                        )
                        .unwrap(),
                    );
                request.respond(response)
            }
            Err(e) => {
                let response = Response::from_string(format!("visualization unavailable: {}", e))
                    .with_status_code(500);
                request.respond(response)
            }
        },

        // API: model statistics for the sidebar numbers
        (&Method::Get, "/api/summary") => {
            let json = serde_json::to_string(&ApiResponse::success(bundle.stats()))?;
            let response = Response::from_string(json).with_header(
                Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap(),
            );
            request.respond(response)
        }

        // 404
        _ => {
            let response = Response::from_string("Not found").with_status_code(404);
            request.respond(response)
        }
    }
}
