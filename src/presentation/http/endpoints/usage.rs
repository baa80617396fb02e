use std::sync::Arc;

use poem_openapi::{OpenApi, payload::Html};

use crate::presentation::http::endpoints::root::{ApiState, EndpointsTags};

#[derive(Clone)]
pub struct UsageEndpoints {
    state: Arc<ApiState>,
}

impl UsageEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl UsageEndpoints {
    /// How to add the bot as a friend
    #[oai(path = "/", method = "get", tag = EndpointsTags::Usage)]
    pub async fn usage(&self) -> Html<String> {
        Html(render_usage(&self.state.qr_code_url))
    }
}

fn render_usage(qr_code_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="ja">
<head><meta charset="utf-8"><title>LINE bot</title></head>
<body>
<h1>LINE bot</h1>
<p>Scan the QR code with LINE to add the bot, then send it any text.</p>
<img src="{}" alt="QR code">
</body>
</html>
"#,
        escape_attribute(qr_code_url)
    )
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
