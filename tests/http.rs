use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    date: String,
    total_today: i64,
    goal_target: i64,
    remaining: i64,
}

#[derive(Debug, Deserialize)]
struct EntryResponse {
    id: String,
    name: String,
    calories: i64,
    timestamp: i64,
}

#[derive(Debug, Deserialize)]
struct ImportResponse {
    imported: usize,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "calorie_log_http_{}_{}.json",
        std::process::id(),
        nanos
    ));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/summary")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_calorie_log"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn import(client: &Client, base_url: &str, body: &str) -> reqwest::Response {
    client
        .post(format!("{base_url}/api/import"))
        .body(body.to_string())
        .send()
        .await
        .unwrap()
}

async fn list_entries(client: &Client, base_url: &str) -> Vec<EntryResponse> {
    client
        .get(format!("{base_url}/api/entries"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_log_entry_updates_summary() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = import(&client, &server.base_url, "Name,Calories,Time\r\n").await;
    assert_eq!(response.status(), 400);

    let cleared = import(
        &client,
        &server.base_url,
        "Name,Calories,Time\r\nseed,0,1970-01-01\r\n",
    )
    .await;
    assert!(cleared.status().is_success());

    let before: SummaryResponse = client
        .get(format!("{}/api/summary", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let entry: EntryResponse = client
        .post(format!("{}/api/entries", server.base_url))
        .json(&serde_json::json!({ "name": "toast", "calories": 250 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(entry.name, "toast");
    assert_eq!(entry.calories, 250);
    assert!(!entry.id.is_empty());
    assert!(entry.timestamp > 0);

    let after: SummaryResponse = client
        .get(format!("{}/api/summary", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(after.total_today, before.total_today + 250);
    assert_eq!(after.remaining, before.remaining - 250);
    assert_eq!(after.date, before.date);
}

#[tokio::test]
async fn http_rejects_negative_calories() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/entries", server.base_url))
        .json(&serde_json::json!({ "name": "antifood", "calories": -10 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn http_import_replaces_list() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let entry = client
        .post(format!("{}/api/entries", server.base_url))
        .json(&serde_json::json!({ "name": "pre-import", "calories": 100 }))
        .send()
        .await
        .unwrap();
    assert!(entry.status().is_success());

    let csv = "Name,Calories,Time\r\n\
               oats,300,2024-01-01T08:00:00Z\r\n\
               eggs,180,2024-01-01T12:00:00Z\r\n";
    let response = import(&client, &server.base_url, csv).await;
    assert!(response.status().is_success());
    let result: ImportResponse = response.json().await.unwrap();
    assert_eq!(result.imported, 2);

    let entries = list_entries(&client, &server.base_url).await;
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.name != "pre-import"));
}

#[tokio::test]
async fn http_bad_import_leaves_list_untouched() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let csv = "Name,Calories,Time\r\nkept,420,2024-02-01T09:00:00Z\r\n";
    assert!(import(&client, &server.base_url, csv)
        .await
        .status()
        .is_success());

    let response = import(
        &client,
        &server.base_url,
        "Name,Calories,Time\r\nbroken,abc,2024-02-02\r\n",
    )
    .await;
    assert_eq!(response.status(), 400);
    let message = response.text().await.unwrap();
    assert!(message.contains("row 2"), "unexpected message: {message}");

    let entries = list_entries(&client, &server.base_url).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "kept");
}

#[tokio::test]
async fn http_export_round_trips_import() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let csv = "Name,Calories,Time\r\n\
               \"soup, hot\",220,2024-03-01T12:00:00Z\r\n\
               bread,140,2024-03-01T12:05:00Z\r\n";
    assert!(import(&client, &server.base_url, csv)
        .await
        .status()
        .is_success());

    let response = client
        .get(format!("{}/api/export", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let disposition = response
        .headers()
        .get("content-disposition")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(
        disposition.contains("calorie_log_"),
        "unexpected disposition: {disposition}"
    );
    let exported = response.text().await.unwrap();

    assert!(import(&client, &server.base_url, &exported)
        .await
        .status()
        .is_success());
    let entries = list_entries(&client, &server.base_url).await;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "soup, hot");
    assert_eq!(entries[1].name, "bread");
}

#[tokio::test]
async fn http_weight_drives_targets() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    // Pin the goal so the asserted target is unambiguous.
    let response = client
        .post(format!("{}/api/goal", server.base_url))
        .json(&serde_json::json!({ "goal": "maintenance" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let summary: SummaryResponse = client
        .post(format!("{}/api/weight", server.base_url))
        .json(&serde_json::json!({ "weight": 180.0 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(summary.goal_target, 2520);

    let summary: SummaryResponse = client
        .post(format!("{}/api/goal", server.base_url))
        .json(&serde_json::json!({ "goal": "two_lb" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(summary.goal_target, 1520);

    let rejected = client
        .post(format!("{}/api/weight", server.base_url))
        .json(&serde_json::json!({ "weight": -5.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(rejected.status(), 400);
}

#[tokio::test]
async fn http_delete_removes_entry() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let csv = "Name,Calories,Time\r\nsolo,330,2024-04-01T10:00:00Z\r\n";
    assert!(import(&client, &server.base_url, csv)
        .await
        .status()
        .is_success());

    let entries = list_entries(&client, &server.base_url).await;
    assert_eq!(entries.len(), 1);

    let response = client
        .delete(format!("{}/api/entries/{}", server.base_url, entries[0].id))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let missing = client
        .delete(format!("{}/api/entries/{}", server.base_url, entries[0].id))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 404);

    assert!(list_entries(&client, &server.base_url).await.is_empty());
}
