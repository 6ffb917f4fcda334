//! Blocking HTTP backend for the `http(...)` statement.

use crate::diagnostics::Diagnostics;
use crate::lexer::Position;

/// Perform a request and print the response body followed by a newline.
///
/// Redirects are followed. A response is printed whatever its status code;
/// only transport-level failures are reported.
pub fn request(
    method: &str,
    url: &str,
    body: Option<&str>,
    position: Position,
    diagnostics: &mut Diagnostics,
) {
    let request = ureq::request(method, url).set("User-Agent", "NaC/1.0");

    let result = match body {
        Some(body) => request
            .set("Content-Type", "application/json")
            .send_string(body),
        None => request.call(),
    };

    let response = match result {
        Ok(response) => response,
        Err(ureq::Error::Status(_, response)) => response,
        Err(err) => {
            diagnostics.report(position, format!("HTTP: {err}"));
            return;
        }
    };

    match response.into_string() {
        Ok(text) => println!("{text}"),
        Err(err) => {
            diagnostics.report(position, format!("HTTP: {err}"));
        }
    }
}
