use crate::error::ServeError;
use crate::router::{Reply, Request, Router};
use std::io::Read;
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use tiny_http::{Header, Response, Server};

/// Number of ports tried after the preferred one.
pub const PORT_PROBE_RANGE: u16 = 100;

/// Binds the first free port in `preferred..=preferred + PORT_PROBE_RANGE`.
///
/// The listener is returned bound, so the port cannot be taken between the
/// probe and the server start.
pub fn bind_available(host: &str, preferred: u16) -> Result<(TcpListener, u16), ServeError> {
    let last = preferred.saturating_add(PORT_PROBE_RANGE);
    for port in preferred..=last {
        match TcpListener::bind((host, port)) {
            Ok(listener) => {
                let bound = listener
                    .local_addr()
                    .map_err(|source| ServeError::Bind {
                        addr: format!("{host}:{port}"),
                        source,
                    })?
                    .port();
                return Ok((listener, bound));
            }
            Err(err) => log::debug!("port {port} on {host} unavailable: {err}"),
        }
    }
    Err(ServeError::NoPort {
        host: host.to_string(),
        first: preferred,
        last,
    })
}

/// Serves `router` on `listener` with `workers` threads until the listener
/// fails. Each worker handles its requests one at a time.
pub fn serve(router: Arc<Router>, listener: TcpListener, workers: usize) -> Result<(), ServeError> {
    let server = Server::from_listener(listener, None)
        .map_err(|err| ServeError::Start(err.to_string()))?;
    let server = Arc::new(server);

    let handles: Vec<_> = (0..workers.max(1))
        .map(|worker| {
            let server = Arc::clone(&server);
            let router = Arc::clone(&router);
            thread::spawn(move || {
                for request in server.incoming_requests() {
                    handle(&router, request);
                }
                log::debug!("worker {worker} stopped");
            })
        })
        .collect();

    for handle in handles {
        if handle.join().is_err() {
            log::warn!("http worker panicked");
        }
    }
    Ok(())
}

fn handle(router: &Router, mut request: tiny_http::Request) {
    let mut body = Vec::new();
    let reply = match request.as_reader().read_to_end(&mut body) {
        Ok(_) => {
            let routed = Request {
                method: request.method().clone(),
                url: request.url().to_string(),
                body,
            };
            router.route(&routed)
        }
        Err(err) => {
            log::warn!("failed to read request body: {err}");
            Reply::text(400, "Bad request")
        }
    };

    log::debug!("{} {} -> {}", request.method(), request.url(), reply.status);
    if let Err(err) = request.respond(into_response(reply)) {
        log::warn!("failed to send response: {err}");
    }
}

fn into_response(reply: Reply) -> Response<std::io::Cursor<Vec<u8>>> {
    reply.headers.iter().fold(
        Response::from_data(reply.body).with_status_code(reply.status),
        |response, (name, value)| match Header::from_bytes(name.as_bytes(), value.as_bytes()) {
            Ok(header) => response.with_header(header),
            Err(()) => {
                log::warn!("dropping invalid header {name}");
                response
            }
        },
    )
}
