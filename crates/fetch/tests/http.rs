//! Drives `HttpDirectory` against a local HTTP server serving canned pages.

use iradio_fetch::error::ErrorKind;
use iradio_fetch::{Directory, HttpDirectory, SiteUrl, Station};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

type Routes = Arc<HashMap<String, (u16, String)>>;

/// Serve `routes` (path -> status and body) on an ephemeral port until the
/// test ends. Every response closes its connection.
async fn serve(routes: Vec<(&str, u16, String)>) -> String {
    let routes: Routes = Arc::new(routes.into_iter().map(|(path, status, body)| (path.to_string(), (status, body))).collect());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else { return };
            let routes = Arc::clone(&routes);
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buffer = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buffer).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buffer[..n]),
                    }
                }
                let request = String::from_utf8_lossy(&request);
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                let (status, body) = routes.get(&path).cloned().unwrap_or((404, "not found".to_string()));
                let response = format!(
                    "HTTP/1.1 {status} X\r\nContent-Length: {}\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    format!("http://{address}")
}

fn category_page(count: u32, last_page: Option<u32>, rows: &[(&str, &str)]) -> String {
    let rows: String = rows
        .iter()
        .map(|(name, href)| format!(r#"<tr><td><h4>{name}</h4><a title="M3U Playlist File" href="{href}">m3u</a></td></tr>"#))
        .collect();
    let pagination = match last_page {
        Some(last) => format!(r#"<ul><li><a>1</a></li><li><a>{last}</a></li><li class="next"><a>»</a></li></ul>"#),
        None => String::new(),
    };
    format!(r#"<html><body><p class="lead">{count} stations</p><table>{rows}</table>{pagination}</body></html>"#)
}

fn directory(root: &str) -> HttpDirectory {
    let site = SiteUrl::parse(root).unwrap();
    HttpDirectory::new(site, "iradio-test", Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_categories() {
    let root = serve(vec![(
        "/",
        200,
        r#"<div class="panel-body"><a href="/stations/rock/">Rock</a><a href="/stations/jazz/">Jazz</a></div>"#.to_string(),
    )])
    .await;
    assert_eq!(directory(&root).categories().await.unwrap(), vec!["Rock", "Jazz"]);
}

#[tokio::test]
async fn test_fetch_category_across_pages() {
    let root = serve(vec![
        ("/stations/classic%20rock/", 200, category_page(3, Some(2), &[("Rock FM", "/pl/a.m3u"), ("Broken", "/pl/missing.m3u")])),
        ("/stations/classic%20rock/page2", 200, category_page(3, None, &[("Indie Wave", "/pl/c.m3u")])),
        ("/pl/a.m3u", 200, "http://a:8000/live\n".to_string()),
        ("/pl/c.m3u", 200, "#EXTM3U\nhttp://c:8000/\n".to_string()),
    ])
    .await;
    let stations = directory(&root).fetch_category("classic rock").await.unwrap();
    // The station whose playlist 404s is skipped; page order is kept.
    assert_eq!(
        stations,
        vec![Station::new("Rock FM", "http://a:8000/live"), Station::new("Indie Wave", "http://c:8000/")]
    );
}

#[tokio::test]
async fn test_calls_do_not_share_results() {
    let root = serve(vec![
        ("/stations/Rock/", 200, category_page(1, None, &[("Rock FM", "/pl/a.m3u")])),
        ("/pl/a.m3u", 200, "http://a/\n".to_string()),
    ])
    .await;
    let directory = directory(&root);
    let first = directory.fetch_category("Rock").await.unwrap();
    let second = directory.fetch_category("Rock").await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_many_playlists_keep_page_order_on_a_spawned_task() {
    let names: Vec<String> = (0..20).map(|n| format!("Station {n}")).collect();
    let hrefs: Vec<String> = (0..20).map(|n| format!("/pl/{n}.m3u")).collect();
    let rows: Vec<(&str, &str)> = names.iter().map(String::as_str).zip(hrefs.iter().map(String::as_str)).collect();
    let mut routes = vec![("/stations/Jazz/", 200, category_page(20, None, &rows))];
    routes.extend(hrefs.iter().enumerate().map(|(n, href)| (href.as_str(), 200, format!("http://s{n}/\n"))));
    let root = serve(routes).await;

    let directory = Arc::new(directory(&root));
    let task = tokio::spawn({
        let directory = Arc::clone(&directory);
        async move { directory.fetch_category("Jazz").await }
    });
    let stations = task.await.unwrap().unwrap();
    let expected: Vec<Station> = (0..20).map(|n| Station::new(format!("Station {n}"), format!("http://s{n}/"))).collect();
    assert_eq!(stations, expected);
}

#[tokio::test]
async fn test_missing_category_is_an_error() {
    let root = serve(vec![]).await;
    let err = directory(&root).fetch_category("Nope").await.unwrap_err();
    assert!(matches!(&*err, ErrorKind::Status(404)));
}

#[tokio::test]
async fn test_unreachable_site() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);
    let err = directory(&format!("http://{address}/")).categories().await.unwrap_err();
    assert!(matches!(&*err, ErrorKind::Network));
    assert!(err.is_retryable());
}
