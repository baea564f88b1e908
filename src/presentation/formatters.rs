//! Text renderings of an outgoing request.

use crate::domain::Request;

/// Equivalent `curl` command line.
///
/// Values are wrapped in plain double or single quotes with no further
/// escaping, so bodies containing `'` will not survive a shell.
pub fn curl_command(request: &Request) -> String {
    let mut command = String::from("curl");

    if !request.method.is_get() {
        command.push_str(&format!(" -X {}", request.method));
    }

    for (name, values) in request.headers.iter() {
        for value in values {
            command.push_str(&format!(" -H \"{}: {}\"", name, value));
        }
    }

    if !request.body.is_blank() {
        command.push_str(&format!(" -d '{}'", request.body.as_text()));
    }

    command.push(' ');
    command.push_str(request.url.as_str());
    command
}

/// Human-readable dump of method, URL, headers and body.
pub fn verbose_dump(request: &Request) -> String {
    let mut dump = String::from("Verbose Request Info:\n");
    dump.push_str(&format!("Method: {}\n", request.method));
    dump.push_str(&format!("URL: {}\n", request.url));
    dump.push_str("Headers:\n");
    for (name, values) in request.headers.iter() {
        dump.push_str(&format!("   {}: {}\n", name, values.join(", ")));
    }
    if !request.body.is_empty() {
        dump.push_str(&format!("Body:\n{}\n", request.body.as_text()));
    }
    dump
}
