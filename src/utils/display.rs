use crate::config::Config;
use crate::models::stream::StreamRecord;
use colored::Colorize;
use std::net::SocketAddr;

const SELECT_PAGE: &str = include_str!("../../templates/select.html");

pub struct DisplayFormatter {
    config: Config,
}

impl DisplayFormatter {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn format_banner(&self, addr: SocketAddr) -> String {
        let mut output = Vec::new();
        output.push(format!("\n=== {} ===", "Stream Picker".bright_white().bold()));
        output.push(format!("Upstream: {}", self.config.api_base.cyan()));
        output.push(format!(
            "Open {} in your browser",
            format!("http://{}/", addr).green().bold()
        ));
        output.join("\n")
    }

    pub fn select_page(&self) -> &'static str {
        SELECT_PAGE
    }

    /// Watch page for the resolved streams, one player per stream.
    pub fn watch_page(&self, streams: &[StreamRecord]) -> String {
        let mut players = String::new();
        for stream in streams {
            players.push_str(&self.format_player(stream));
        }

        format!(
            "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>Watching {count} stream(s)</title>\n\
             <style>body{{margin:0;background:#111;color:#eee;font-family:sans-serif}}\
             .grid{{display:grid;grid-template-columns:repeat(auto-fit,minmax(480px,1fr));\
             gap:8px;padding:8px}}\
             .player iframe{{width:100%;aspect-ratio:16/9;border:0}}\
             .player img{{max-width:100%}}a{{color:#8cf}}</style>\n\
             </head>\n<body>\n<p><a href=\"/\">&larr; Back</a></p>\n\
             <div class=\"grid\">\n{players}</div>\n</body>\n</html>\n",
            count = streams.len(),
            players = players,
        )
    }

    fn format_player(&self, stream: &StreamRecord) -> String {
        let title = stream.name.as_deref().unwrap_or("Untitled stream");
        let mut html = format!(
            "<section class=\"player\">\n<h2>{}</h2>\n<p>{} &middot; {}</p>\n",
            escape_html(title),
            escape_html(&stream.category),
            stream.status
        );

        if let Some(iframe) = &stream.iframe {
            html.push_str(&format!(
                "<iframe src=\"{}\" allowfullscreen allow=\"autoplay; fullscreen\"></iframe>\n",
                escape_html(iframe)
            ));
        } else {
            if let Some(poster) = &stream.poster {
                html.push_str(&format!(
                    "<img src=\"{}\" alt=\"{}\">\n",
                    escape_html(poster),
                    escape_html(title)
                ));
            }
            if let Some(uri_name) = &stream.uri_name {
                let url = self.config.live_url(uri_name);
                html.push_str(&format!(
                    "<p><a href=\"{}\" target=\"_blank\" rel=\"noopener\">Open stream</a></p>\n",
                    escape_html(&url)
                ));
            }
        }

        html.push_str("</section>\n");
        html
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
