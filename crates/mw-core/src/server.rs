//! HTTP front end.
//!
//! A single-threaded `tiny_http` loop: each request is read fully, routed
//! through [`handle`] and answered before the next one is accepted. Routing
//! is a pure function of (method, URL, body) so it is tested without
//! sockets.

use std::collections::HashMap;
use std::io::{Cursor, Read};

use chrono::Local;
use mw_common::{Error, RecordId, Result};
use mw_report::{
    row_views, AddPage, AnalyticsPage, DashboardPage, EditPage, ErrorPage, Flash,
    PredictionPage, RecordForm, RecordsPage, Template,
};
use mw_store::SortOrder;
use serde_json::json;
use tiny_http::{Header, Response, Server};
use tracing::{error, info, warn};

use crate::service::MessService;
use crate::validate::{parse_integer, parse_optional_weekday, validate_weekday, ObservationInput};

/// Fixed status messages carried across redirects in the `notice` query
/// parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Added,
    Updated,
    Deleted,
    NotFound,
}

impl Notice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Notice::Added => "added",
            Notice::Updated => "updated",
            Notice::Deleted => "deleted",
            Notice::NotFound => "not-found",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "added" => Some(Notice::Added),
            "updated" => Some(Notice::Updated),
            "deleted" => Some(Notice::Deleted),
            "not-found" => Some(Notice::NotFound),
            _ => None,
        }
    }

    pub fn flash(&self) -> Flash {
        match self {
            Notice::Added => Flash::success("Record added successfully!"),
            Notice::Updated => Flash::success("Record updated successfully!"),
            Notice::Deleted => Flash::success("Record deleted successfully!"),
            Notice::NotFound => Flash::danger("Record not found"),
        }
    }
}

/// Response produced by [`handle`].
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub location: Option<String>,
    pub body: String,
}

const HTML: &str = "text/html; charset=utf-8";
const JSON: &str = "application/json";

impl HttpResponse {
    fn html<T: Template>(status: u16, page: &T) -> Self {
        match page.render() {
            Ok(body) => Self {
                status,
                content_type: HTML,
                location: None,
                body,
            },
            Err(e) => {
                error!(error = %e, "template rendering failed");
                Self {
                    status: 500,
                    content_type: "text/plain; charset=utf-8",
                    location: None,
                    body: "Something went wrong while processing the request".to_string(),
                }
            }
        }
    }

    fn json(status: u16, value: serde_json::Value) -> Self {
        Self {
            status,
            content_type: JSON,
            location: None,
            body: value.to_string(),
        }
    }

    /// 303 See Other, so the browser follows with a GET.
    fn redirect(path: &str, notice: Option<Notice>) -> Self {
        let location = match notice {
            Some(n) => format!("{path}?notice={}", n.as_str()),
            None => path.to_string(),
        };
        Self {
            status: 303,
            content_type: HTML,
            location: Some(location),
            body: String::new(),
        }
    }

    fn failure(err: &Error) -> Self {
        error!(code = err.code(), error = %err, "request failed");
        Self::html(
            500,
            &ErrorPage::new("Something went wrong", err.user_message()),
        )
    }

    fn not_found() -> Self {
        Self::html(
            404,
            &ErrorPage::new("Page not found", "There is nothing at this address."),
        )
    }

    fn method_not_allowed() -> Self {
        Self::html(
            405,
            &ErrorPage::new("Method not allowed", "This page does not accept that request."),
        )
    }

    fn into_tiny(self) -> Response<Cursor<Vec<u8>>> {
        let mut response = Response::from_data(self.body.into_bytes()).with_status_code(self.status);
        if let Ok(h) = Header::from_bytes(&b"Content-Type"[..], self.content_type.as_bytes()) {
            response.add_header(h);
        }
        if let Some(location) = self.location {
            if let Ok(h) = Header::from_bytes(&b"Location"[..], location.as_bytes()) {
                response.add_header(h);
            }
        }
        response
    }
}

type Params = HashMap<String, String>;

fn parse_params(text: &str) -> Params {
    url::form_urlencoded::parse(text.as_bytes())
        .into_owned()
        .collect()
}

fn field<'a>(params: &'a Params, name: &str) -> &'a str {
    params.get(name).map(String::as_str).unwrap_or("")
}

fn notice_flash(query: &Params) -> Option<Flash> {
    query
        .get("notice")
        .and_then(|n| Notice::parse(n))
        .map(|n| n.flash())
}

fn record_id(segment: &str) -> Option<RecordId> {
    segment.parse().ok()
}

/// Route one request.
pub fn handle(service: &MessService, method: &str, url: &str, body: &str) -> HttpResponse {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    let query = parse_params(query);
    let path = if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    };

    match (method, path) {
        ("GET", "/") => add_form(&query),
        ("POST", "/add") => add_record(service, &parse_params(body)),
        ("GET", "/dashboard") => dashboard(service, &query),
        ("GET", "/analytics") => analytics(service, &query),
        ("GET", "/records") => records(service, &query),
        ("GET", "/predict") => {
            let mut page = PredictionPage::blank();
            page.flash = notice_flash(&query);
            HttpResponse::html(200, &page)
        }
        ("POST", "/predict") => predict(service, &parse_params(body)),
        ("GET", "/api/metrics") => api_metrics(service),
        ("GET", "/api/charts") => api_charts(service),
        (_, "/" | "/add" | "/dashboard" | "/analytics" | "/records" | "/predict") => {
            HttpResponse::method_not_allowed()
        }
        (_, p) => {
            if let Some(id) = p.strip_prefix("/edit/").and_then(record_id) {
                match method {
                    "GET" => edit_form(service, id),
                    "POST" => edit_record(service, id, &parse_params(body)),
                    _ => HttpResponse::method_not_allowed(),
                }
            } else if let Some(id) = p.strip_prefix("/delete/").and_then(record_id) {
                match method {
                    "GET" | "POST" => delete_record(service, id),
                    _ => HttpResponse::method_not_allowed(),
                }
            } else {
                HttpResponse::not_found()
            }
        }
    }
}

fn form_from(params: &Params) -> RecordForm {
    RecordForm::new(
        field(params, "date"),
        field(params, "students"),
        field(params, "cooked"),
        field(params, "leftover"),
    )
}

fn input_from(params: &Params) -> Result<ObservationInput> {
    ObservationInput::from_fields(
        field(params, "date"),
        field(params, "students"),
        field(params, "cooked"),
        field(params, "leftover"),
    )
}

fn add_form(query: &Params) -> HttpResponse {
    let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
    HttpResponse::html(
        200,
        &AddPage::new(RecordForm::with_date(today), notice_flash(query)),
    )
}

fn add_record(service: &MessService, params: &Params) -> HttpResponse {
    match input_from(params).and_then(|input| service.add(&input)) {
        Ok(_) => HttpResponse::redirect("/dashboard", Some(Notice::Added)),
        Err(err @ Error::Validation(_)) => HttpResponse::html(
            400,
            &AddPage::new(form_from(params), Some(Flash::danger(err.user_message()))),
        ),
        Err(err) => HttpResponse::failure(&err),
    }
}

fn dashboard(service: &MessService, query: &Params) -> HttpResponse {
    let last_updated = Local::now().format("%d %b %Y").to_string();
    let flash = notice_flash(query);
    match service.dashboard() {
        Ok(data) => HttpResponse::html(200, &DashboardPage::new(Some(&data), last_updated, flash)),
        Err(Error::NoData) => HttpResponse::html(200, &DashboardPage::new(None, last_updated, flash)),
        Err(err @ Error::DegenerateData(_)) => HttpResponse::html(
            200,
            &DashboardPage::new(None, last_updated, Some(Flash::warning(err.user_message()))),
        ),
        Err(err) => HttpResponse::failure(&err),
    }
}

fn analytics(service: &MessService, query: &Params) -> HttpResponse {
    let flash = notice_flash(query);
    let page = match service.get_chart_data() {
        Ok(series) => AnalyticsPage::new(Some(&series), flash),
        Err(Error::NoData) => AnalyticsPage::new(None, flash),
        Err(err) => return HttpResponse::failure(&err),
    };
    match page {
        Ok(page) => HttpResponse::html(200, &page),
        Err(e) => HttpResponse::failure(&Error::from(e)),
    }
}

fn records(service: &MessService, query: &Params) -> HttpResponse {
    match service.list_rows(SortOrder::Descending) {
        Ok(rows) => HttpResponse::html(
            200,
            &RecordsPage::new(row_views(&rows), notice_flash(query)),
        ),
        Err(err) => HttpResponse::failure(&err),
    }
}

fn edit_form(service: &MessService, id: RecordId) -> HttpResponse {
    match service.get(id) {
        Ok(record) => HttpResponse::html(200, &EditPage::for_record(&record)),
        Err(Error::RecordNotFound { .. }) => {
            HttpResponse::redirect("/records", Some(Notice::NotFound))
        }
        Err(err) => HttpResponse::failure(&err),
    }
}

fn edit_record(service: &MessService, id: RecordId, params: &Params) -> HttpResponse {
    match input_from(params).and_then(|input| service.edit(id, &input)) {
        Ok(()) => HttpResponse::redirect("/records", Some(Notice::Updated)),
        Err(err @ Error::Validation(_)) => HttpResponse::html(
            400,
            &EditPage::new(id.0, form_from(params), Some(Flash::danger(err.user_message()))),
        ),
        Err(Error::RecordNotFound { .. }) => {
            HttpResponse::redirect("/records", Some(Notice::NotFound))
        }
        Err(err) => HttpResponse::failure(&err),
    }
}

fn delete_record(service: &MessService, id: RecordId) -> HttpResponse {
    match service.delete(id) {
        Ok(_) => HttpResponse::redirect("/records", Some(Notice::Deleted)),
        Err(err) => HttpResponse::failure(&err),
    }
}

fn predict(service: &MessService, params: &Params) -> HttpResponse {
    let attendees_text = field(params, "students");
    let weekday = parse_optional_weekday(params.get("weekday").map(String::as_str));
    let selected = weekday
        .as_ref()
        .ok()
        .and_then(|w| w.and_then(|w| validate_weekday(w).ok()));

    let outcome = parse_integer("Number of attendees", attendees_text)
        .and_then(|attendees| Ok((attendees, weekday?)))
        .and_then(|(attendees, weekday)| service.predict(attendees, weekday));

    match outcome {
        Ok(result) => HttpResponse::html(
            200,
            &PredictionPage::submitted(attendees_text, Some(result.weekday_index), Some(&result), None),
        ),
        Err(err) if err.is_recoverable() || matches!(err, Error::ModelFit(_)) => {
            let flash = if matches!(err, Error::ModelFit(_)) {
                Flash::danger(err.user_message())
            } else {
                Flash::warning(err.user_message())
            };
            HttpResponse::html(
                200,
                &PredictionPage::submitted(attendees_text, selected, None, Some(flash)),
            )
        }
        Err(err) => HttpResponse::failure(&err),
    }
}

fn api_error(err: &Error) -> HttpResponse {
    let status = match err {
        Error::NoData => 404,
        Error::DegenerateData(_) => 422,
        _ => {
            error!(code = err.code(), error = %err, "api request failed");
            500
        }
    };
    HttpResponse::json(
        status,
        json!({ "error": { "code": err.code(), "message": err.user_message() } }),
    )
}

fn api_metrics(service: &MessService) -> HttpResponse {
    match service.get_dashboard_metrics() {
        Ok(metrics) => HttpResponse::json(200, json!({ "metrics": metrics })),
        Err(err) => api_error(&err),
    }
}

fn api_charts(service: &MessService) -> HttpResponse {
    match service.get_chart_data() {
        Ok(charts) => HttpResponse::json(200, json!({ "charts": charts })),
        Err(err) => api_error(&err),
    }
}

/// Listen on `bind` and serve requests until the process is stopped.
pub fn serve(service: MessService, bind: &str) -> Result<()> {
    let server = Server::http(bind).map_err(|e| {
        Error::Io(std::io::Error::other(format!("cannot listen on {bind}: {e}")))
    })?;
    info!(%bind, "listening");

    for mut request in server.incoming_requests() {
        let mut body = String::new();
        if let Err(e) = request.as_reader().read_to_string(&mut body) {
            warn!(error = %e, "failed to read request body");
        }
        let method = request.method().as_str().to_string();
        let url = request.url().to_string();

        let response = handle(&service, &method, &url, &body);
        info!(%method, %url, status = response.status, "request handled");

        if let Err(e) = request.respond(response.into_tiny()) {
            warn!(error = %e, "failed to send response");
        }
    }
    Ok(())
}
