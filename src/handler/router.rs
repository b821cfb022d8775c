//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: body limits, route matching,
//! method policy, view dispatch and page rendering.

use crate::config::AppState;
use crate::handler::routes::Route;
use crate::http::{self, FormData};
use crate::logger::{self, AccessLogEntry};
use crate::templates::{self, SiteContext};
use crate::views::{self, Page};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes, Incoming};
use hyper::header::CONTENT_LENGTH;
use hyper::{HeaderMap, Method, Request, Response, StatusCode, Uri};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// A built response and the view that produced it, if a route matched
pub struct Dispatched {
    pub response: Response<Full<Bytes>>,
    pub view: Option<&'static str>,
}

impl Dispatched {
    const fn unrouted(response: Response<Full<Bytes>>) -> Self {
        Self {
            response,
            view: None,
        }
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let start = Instant::now();
    let (parts, body) = req.into_parts();
    let max_body_size = state.config.http.max_body_size;

    let mut entry = state
        .config
        .logging
        .access_log
        .then(|| AccessLogEntry::from_request(peer_addr, &parts));

    let dispatched = if let Some(resp) = check_body_size(&parts.headers, max_body_size) {
        Dispatched::unrouted(resp)
    } else if parts.method == Method::POST {
        match read_body(body, max_body_size).await {
            Ok(bytes) => {
                let data = FormData::from_request(&parts.headers, &bytes);
                dispatch(&state, &parts.method, &parts.uri, data)
            }
            Err(resp) => Dispatched::unrouted(resp),
        }
    } else {
        dispatch(&state, &parts.method, &parts.uri, FormData::default())
    };

    if let Some(entry) = entry.as_mut() {
        entry.status = dispatched.response.status().as_u16();
        entry.body_bytes = body_len(&dispatched.response);
        entry.view = dispatched.view;
        entry.request_time_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    Ok(dispatched.response)
}

/// Route a request with an already decoded body
///
/// Never fails: unknown paths, disallowed methods and render errors all
/// map to status responses.
pub fn dispatch(state: &AppState, method: &Method, uri: &Uri, data: FormData) -> Dispatched {
    let config = &state.config;
    let path = uri.path();

    let Some(route) = Route::resolve(path) else {
        if let Some(target) = slash_redirect_target(uri, method, config.http.append_slash) {
            logger::log_debug(&format!("Redirecting {path} to {target}"));
            return Dispatched::unrouted(http::build_permanent_redirect(&target));
        }
        return Dispatched::unrouted(http::build_404_response());
    };

    let response = if method == Method::OPTIONS {
        http::build_options_response(route.allow_header(), config.http.enable_cors)
    } else if !route.allows(method) {
        logger::log_warning(&format!("Method not allowed: {method} {path}"));
        http::build_405_response(route.allow_header())
    } else {
        let page = run_view(route, method, data);
        let site = SiteContext::new(&config.site.title, &config.site.rnx_script_url, route.path());
        match templates::render(&state.templates, &page, &site) {
            Ok(html) => http::build_html_response(
                StatusCode::OK,
                html,
                method == Method::HEAD,
                &config.http,
            ),
            Err(e) => {
                logger::log_error(&format!(
                    "Failed to render '{}': {}",
                    page.template,
                    error_chain(&e)
                ));
                http::build_500_response()
            }
        }
    };

    Dispatched {
        response,
        view: Some(route.name()),
    }
}

fn run_view(route: Route, method: &Method, data: FormData) -> Page {
    match route {
        Route::Index => views::index(),
        Route::Form => views::form_example(method, data),
        Route::Components => views::components_example(),
        Route::Plugins => views::plugins_example(),
    }
}

/// Redirect target for a GET/HEAD path that only matches with a trailing slash
fn slash_redirect_target(uri: &Uri, method: &Method, append_slash: bool) -> Option<String> {
    let path = uri.path();
    if !append_slash || path.ends_with('/') || !matches!(*method, Method::GET | Method::HEAD) {
        return None;
    }
    let slashed = format!("{path}/");
    Route::resolve(&slashed)?;
    Some(match uri.query() {
        Some(query) => format!("{slashed}?{query}"),
        None => slashed,
    })
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = headers.get(CONTENT_LENGTH)?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Collect the request body, enforcing the size limit while streaming
async fn read_body(body: Incoming, max_body_size: u64) -> Result<Bytes, Response<Full<Bytes>>> {
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => {
            logger::log_error(&format!(
                "Request body exceeded {max_body_size} bytes while reading"
            ));
            Err(http::build_413_response())
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            Err(http::build_400_response())
        }
    }
}

fn body_len(response: &Response<Full<Bytes>>) -> usize {
    response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0)
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
