use crate::{error::Error, util, Method, RequestData};
use hyper::{
    body,
    service::{make_service_fn, service_fn},
    Body, Request, Response, Server, StatusCode,
};
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    convert::Infallible,
    io,
    net::{SocketAddr, TcpListener},
    sync::{mpsc, Arc, Mutex},
    thread::{self, JoinHandle},
    time::Duration,
};
use tokio::{runtime::Runtime, sync::oneshot};

#[derive(Debug, Clone)]
pub struct StubResponse {
    status_code: u16,
    headers: HashMap<String, String>,
    body: String,
    delay: Option<Duration>,
}

impl StubResponse {
    pub fn json(status_code: u16, body: Value) -> Self {
        Self::text(status_code, body.to_string()).with_header("content-type", "application/json")
    }

    pub fn text<S: Into<String>>(status_code: u16, body: S) -> Self {
        Self {
            status_code,
            headers: HashMap::new(),
            body: body.into(),
            delay: None,
        }
    }

    pub fn with_header<S1: Into<String>, S2: Into<String>>(mut self, name: S1, value: S2) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Holds the response back, for exercising client timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Canned responses keyed by method and path.
///
/// A route registered with a query string only answers that exact query;
/// one registered without answers any query.
#[derive(Debug, Clone, Default)]
pub struct StubRoutes {
    routes: HashMap<(String, String), StubResponse>,
}

impl StubRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route<S: Into<String>>(mut self, method: Method, path: S, response: StubResponse) -> Self {
        self.routes
            .insert((method.as_str().into(), path.into()), response);
        self
    }

    fn find(&self, method: &str, path: &str, query: Option<&str>) -> StubResponse {
        let exact = query.and_then(|query| {
            self.routes
                .get(&(method.to_string(), format!("{}?{}", path, query)))
        });

        exact
            .or_else(|| self.routes.get(&(method.to_string(), path.to_string())))
            .cloned()
            .unwrap_or_else(|| {
                StubResponse::json(
                    404,
                    json!({ "error": format!("no stub for {} {}", method, path) }),
                )
            })
    }
}

/// A local HTTP server answering with canned responses, standing in for the
/// application under test.
///
/// It listens on an ephemeral 127.0.0.1 port and runs on its own thread with
/// its own runtime, so it works from both sync and async tests. Dropping it
/// shuts it down.
#[derive(Debug)]
pub struct StubServer {
    address: SocketAddr,
    received: Arc<Mutex<Vec<RequestData>>>,
    shutdown: Option<oneshot::Sender<()>>,
    join_handle: Option<JoinHandle<()>>,
}

impl StubServer {
    pub fn start(routes: StubRoutes) -> Result<Self, Error> {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))?;
        listener.set_nonblocking(true)?;
        let address = listener.local_addr()?;

        let routes = Arc::new(routes);
        let received = Arc::new(Mutex::new(Vec::new()));
        let (shutdown_sender, shutdown_receiver) = oneshot::channel::<()>();
        let (ready_sender, ready_receiver) = mpsc::channel::<Result<(), Error>>();

        let server_received = received.clone();
        let join_handle = thread::spawn(move || {
            let runtime = match Runtime::new() {
                Ok(runtime) => runtime,
                Err(e) => {
                    let _ = ready_sender.send(Err(e.into()));
                    return;
                }
            };

            runtime.block_on(async move {
                let builder = match Server::from_tcp(listener) {
                    Ok(builder) => builder,
                    Err(e) => {
                        let _ = ready_sender.send(Err(e.into()));
                        return;
                    }
                };

                let server = builder.serve(make_service_fn(move |_| {
                    let routes = routes.clone();
                    let received = server_received.clone();

                    async move {
                        Ok::<_, Infallible>(service_fn(move |request| {
                            let routes = routes.clone();
                            let received = received.clone();

                            async move {
                                Ok::<_, Infallible>(respond(request, &routes, &received).await)
                            }
                        }))
                    }
                }));

                let _ = ready_sender.send(Ok(()));

                let graceful = server.with_graceful_shutdown(async move {
                    let _ = shutdown_receiver.await;
                });

                if let Err(e) = graceful.await {
                    eprintln!("Stub server error: {}", e);
                }
            });
        });

        match ready_receiver.recv() {
            Ok(Ok(())) => Ok(Self {
                address,
                received,
                shutdown: Some(shutdown_sender),
                join_handle: Some(join_handle),
            }),
            Ok(Err(e)) => {
                let _ = join_handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = join_handle.join();
                Err(Error::IoError(io::Error::new(
                    io::ErrorKind::Other,
                    "the stub server thread exited before it was ready",
                )))
            }
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.address)
    }

    /// Requests received so far, in arrival order.
    pub fn received_requests(&self) -> Result<Vec<RequestData>, Error> {
        Ok(self.received.lock()?.clone())
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }

        if let Some(join_handle) = self.join_handle.take() {
            if join_handle.join().is_err() {
                eprintln!("The stub server thread panicked");
            }
        }
    }
}

async fn respond(
    mut request: Request<Body>,
    routes: &StubRoutes,
    received: &Mutex<Vec<RequestData>>,
) -> Response<Body> {
    match handle_request(&mut request, routes, received).await {
        Ok(response) => response,
        Err(e) => {
            eprintln!("Stub server error: {}", e);
            let mut response = Response::new(Body::from(e.to_string()));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        }
    }
}

async fn handle_request(
    request: &mut Request<Body>,
    routes: &StubRoutes,
    received: &Mutex<Vec<RequestData>>,
) -> Result<Response<Body>, Error> {
    let request_data = read_request_data(request).await?;
    let stub = routes.find(
        &request_data.method,
        request.uri().path(),
        request.uri().query(),
    );

    received.lock()?.push(request_data);

    if let Some(delay) = stub.delay {
        tokio::time::sleep(delay).await;
    }

    let mut response_builder = Response::builder().status(stub.status_code);

    util::put_headers(
        response_builder.headers_mut().ok_or(Error::InvalidBody)?,
        &stub.headers,
    )?;

    Ok(response_builder.body(stub.body.into())?)
}

async fn read_request_data(request: &mut Request<Body>) -> Result<RequestData, Error> {
    let method = request.method().to_string();
    let uri = request.uri().to_string();
    let headers = util::extract_headers(request.headers());

    let body = body::to_bytes(request.body_mut())
        .await
        .map_err(|_| Error::InvalidBody)?;

    Ok(RequestData {
        method,
        uri,
        headers,
        body: String::from_utf8_lossy(&body).into(),
    })
}
