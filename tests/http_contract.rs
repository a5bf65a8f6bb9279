use std::error::Error;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::{Value, json};

use lattice::core::{
    AppRunner, HttpLogReader, LogMessage, LogReader, LogStreamError, StartAppParams,
};
use lattice::receptor::{
    ActualLrpState, DesiredLrpUpdateRequest, HttpReceptorClient, ReceptorClient, ReceptorError,
};

type TestResult<T = ()> = Result<T, Box<dyn Error>>;

#[derive(Debug, Clone)]
struct RecordedRequest {
    method: String,
    target: String,
    body: String,
}

enum Reply {
    Json(u16, String),
    Stream(Vec<String>),
}

type Responder = dyn Fn(&RecordedRequest) -> Reply + Send + Sync;

/// Loopback HTTP/1.1 server answering one request per connection.
struct StubServer {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    fn start(responder: Box<Responder>) -> TestResult<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let base_url = format!("http://{}", listener.local_addr()?);
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                if let Err(err) = serve(stream, &*responder, &recorded) {
                    eprintln!("stub server connection failed: {err}");
                }
            }
        });

        Ok(Self { base_url, requests })
    }

    fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn serve(
    stream: TcpStream,
    responder: &Responder,
    recorded: &Mutex<Vec<RecordedRequest>>,
) -> TestResult {
    let mut reader = BufReader::new(stream.try_clone()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();

    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        reader.read_line(&mut header)?;
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse()?;
            }
        }
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body)?;

    let request = RecordedRequest {
        method,
        target,
        body: String::from_utf8(body)?,
    };
    recorded.lock().unwrap().push(request.clone());

    let mut stream = stream;
    match responder(&request) {
        Reply::Json(status, body) => {
            write!(
                stream,
                "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )?;
        }
        Reply::Stream(frames) => {
            write!(
                stream,
                "HTTP/1.1 200 OK\r\nContent-Type: application/x-ndjson\r\nConnection: close\r\n\r\n"
            )?;
            for frame in frames {
                stream.write_all(frame.as_bytes())?;
                stream.write_all(b"\n")?;
                stream.flush()?;
            }
        }
    }
    stream.flush()?;
    Ok(())
}

fn ok_json(value: Value) -> Reply {
    Reply::Json(200, value.to_string())
}

#[test]
fn receptor_client_speaks_the_desired_lrp_api() -> TestResult {
    let server = StubServer::start(Box::new(|request: &RecordedRequest| {
        match (request.method.as_str(), request.target.as_str()) {
            ("GET", "/v1/desired_lrps") => ok_json(json!([
                { "process_guid": "web", "instances": 2, "rootfs": "docker:///lattice/web" }
            ])),
            ("GET", "/v1/desired_lrps/web/actual_lrps") => ok_json(json!([
                { "process_guid": "web", "instance_guid": "a", "index": 0, "state": "CLAIMED" },
                { "process_guid": "web", "instance_guid": "b", "index": 1, "state": "RUNNING" }
            ])),
            ("POST", "/v1/desired_lrps") => Reply::Json(201, String::new()),
            ("PUT", "/v1/desired_lrps/web") | ("DELETE", "/v1/desired_lrps/web") => {
                Reply::Json(204, String::new())
            }
            _ => Reply::Json(
                404,
                json!({ "name": "ResourceNotFound", "message": "no such route" }).to_string(),
            ),
        }
    }))?;
    let client = HttpReceptorClient::new(server.base_url.as_str());

    let desired = client.desired_lrps()?;
    assert_eq!(desired.len(), 1);
    assert_eq!(desired[0].process_guid, "web");
    assert_eq!(desired[0].root_fs, "docker:///lattice/web");

    let actual = client.actual_lrps_by_process_guid("web")?;
    let states: Vec<ActualLrpState> = actual.iter().map(|lrp| lrp.state).collect();
    assert_eq!(states, vec![ActualLrpState::Claimed, ActualLrpState::Running]);

    client.update_desired_lrp("web", DesiredLrpUpdateRequest { instances: Some(4) })?;
    client.delete_desired_lrp("web")?;

    let runner = AppRunner::new(&client, "lattice.dev");
    assert!(runner.app_exists("web")?);
    assert!(runner.is_app_up("web")?);
    runner.start_app(StartAppParams::new("api", "docker:///lattice/api", "/run"))?;

    let requests = server.requests();
    let put = requests
        .iter()
        .find(|request| request.method == "PUT")
        .expect("update request sent");
    assert_eq!(serde_json::from_str::<Value>(&put.body)?, json!({ "instances": 4 }));

    let post = requests
        .iter()
        .find(|request| request.method == "POST")
        .expect("create request sent");
    let body: Value = serde_json::from_str(&post.body)?;
    assert_eq!(body["process_guid"], "api");
    assert_eq!(body["rootfs"], "docker:///lattice/api");
    assert_eq!(body["routes"], json!(["api.lattice.dev"]));
    assert_eq!(body["setup"]["download"]["to"], "/tmp");
    assert_eq!(body["monitor"]["run"]["path"], "/tmp/spy");
    assert_eq!(body["env"], json!([{ "name": "PORT", "value": "8080" }]));

    assert!(requests.iter().any(|request| request.method == "DELETE"));
    Ok(())
}

#[test]
fn receptor_error_bodies_become_api_errors() -> TestResult {
    let server = StubServer::start(Box::new(|_: &RecordedRequest| {
        Reply::Json(
            500,
            json!({ "name": "UnknownError", "message": "Something Bad" }).to_string(),
        )
    }))?;
    let client = HttpReceptorClient::new(server.base_url.as_str());

    let err = client.delete_desired_lrp("web").unwrap_err();
    assert_eq!(
        err,
        ReceptorError::Api {
            status: 500,
            name: "UnknownError".to_string(),
            message: "Something Bad".to_string(),
        }
    );

    let runner = AppRunner::new(&client, "lattice.dev");
    let err = runner.scale_app("web", 2).unwrap_err();
    assert_eq!(err.to_string(), "Something Bad");
    Ok(())
}

#[test]
fn process_guids_are_escaped_on_the_wire() -> TestResult {
    let server = StubServer::start(Box::new(|request: &RecordedRequest| {
        if request.method == "GET" {
            ok_json(json!([]))
        } else {
            Reply::Json(204, String::new())
        }
    }))?;
    let client = HttpReceptorClient::new(server.base_url.as_str());

    client.delete_desired_lrp("my app/../other")?;
    client.update_desired_lrp("a?b", DesiredLrpUpdateRequest { instances: Some(1) })?;
    assert!(client.actual_lrps_by_process_guid("x#y")?.is_empty());

    let targets: Vec<String> = server
        .requests()
        .into_iter()
        .map(|request| request.target)
        .collect();
    assert_eq!(
        targets,
        vec![
            "/v1/desired_lrps/my%20app%2F..%2Fother".to_string(),
            "/v1/desired_lrps/a%3Fb".to_string(),
            "/v1/desired_lrps/x%23y/actual_lrps".to_string(),
        ]
    );
    Ok(())
}

#[test]
fn log_reader_streams_frames_until_close() -> TestResult {
    let server = StubServer::start(Box::new(|_: &RecordedRequest| {
        Reply::Stream(vec![
            json!({
                "type": "log",
                "message": "First log",
                "timestamp": 1_420_070_400_000_000_000i64,
                "source_type": "APP",
                "source_instance": "0"
            })
            .to_string(),
            String::new(),
            json!({ "type": "error", "message": "First Error" }).to_string(),
            "{ not json".to_string(),
            json!({
                "type": "log",
                "message": "Second log",
                "timestamp": 2,
                "source_type": "RTR",
                "source_instance": "1"
            })
            .to_string(),
        ])
    }))?;
    let reader = HttpLogReader::new(server.base_url.as_str());

    let mut messages = Vec::new();
    let mut errors = Vec::new();
    reader.tail_logs(
        "my-app-guid",
        &mut |message| messages.push(message),
        &mut |error| errors.push(error),
    );

    assert_eq!(
        messages,
        vec![
            LogMessage::new("First log", 1_420_070_400_000_000_000, "APP", "0"),
            LogMessage::new("Second log", 2, "RTR", "1"),
        ]
    );
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0], LogStreamError::Remote("First Error".to_string()));
    assert!(matches!(errors[1], LogStreamError::Decode(_)));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].target, "/tail/?app=my-app-guid");
    Ok(())
}
