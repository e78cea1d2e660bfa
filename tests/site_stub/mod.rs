use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// A local storefront zoo. Each path serves a page carrying one platform's markers.
pub struct SiteServer {
    pub base_url: String,
    shutdown_tx: mpsc::Sender<()>,
    handle: Option<thread::JoinHandle<()>>,
}

impl SiteServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Drop for SiteServer {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

pub fn spawn_site_server() -> SiteServer {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
    let base_url = format!("http://{}", server.server_addr());

    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            let request = match server.recv_timeout(Duration::from_millis(50)) {
                Ok(Some(req)) => req,
                Ok(None) => continue,
                Err(_) => break,
            };

            let url = request.url().to_string();
            let path = url.split('?').next().unwrap_or(&url).to_owned();

            let (status, body, extra_header): (u16, &str, Option<(&str, &str)>) =
                match path.as_str() {
                    "/shopify" => (
                        200,
                        r#"<!doctype html>
<html>
  <head>
    <title>Shopify Store</title>
    <link rel="stylesheet" href="//cdn.shopify.com/s/files/1/theme.css">
  </head>
  <body><h1>Shop</h1></body>
</html>
"#,
                        None,
                    ),
                    "/woo" => (
                        200,
                        r#"<!doctype html>
<html>
  <head>
    <title>Woo Store</title>
    <link rel="stylesheet" href="/wp-content/plugins/woocommerce/assets/css/woocommerce.css">
    <script src="/wp-includes/js/jquery/jquery.min.js"></script>
  </head>
  <body class="woocommerce"><h1>Shop</h1></body>
</html>
"#,
                        None,
                    ),
                    "/magento" => (
                        200,
                        r#"<!doctype html>
<html>
  <head><script type="text/x-magento-init">{}</script></head>
  <body><h1>Shop</h1></body>
</html>
"#,
                        None,
                    ),
                    "/headers" => (
                        200,
                        "<!doctype html><html><body>Nothing to see</body></html>\n",
                        Some(("X-Shopify-Stage", "production")),
                    ),
                    _ => (404, "not found", None),
                };

            let mut response = tiny_http::Response::from_string(body).with_status_code(status);
            if status == 200 {
                let header = tiny_http::Header::from_bytes(
                    &b"Content-Type"[..],
                    &b"text/html; charset=utf-8"[..],
                )
                .expect("build header");
                response = response.with_header(header);
            }
            if let Some((name, value)) = extra_header {
                let header = tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes())
                    .expect("build header");
                response = response.with_header(header);
            }

            let _ = request.respond(response);
        }
    });

    SiteServer {
        base_url,
        shutdown_tx,
        handle: Some(handle),
    }
}
