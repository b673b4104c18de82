use uuid::Uuid;

use crate::lookup::{ResultRecord, UserProfile};
use crate::utils::escape_html;

const STYLE: &str = r#"
body {
    margin: 0;
    min-height: 100vh;
    background-color: #0e1015;
    background-image: radial-gradient(circle at 50% 0%, #1e212b 0%, #0e1015 70%);
    color: #ffffff;
    font-family: 'Inter', system-ui, sans-serif;
}
main { max-width: 760px; margin: 0 auto; padding: 2rem 1rem; }
h1 {
    font-weight: 800;
    text-align: center;
    margin-bottom: 0.5rem;
    background: linear-gradient(90deg, #5865F2, #9B84EC);
    -webkit-background-clip: text;
    -webkit-text-fill-color: transparent;
}
.subtitle { color: #b9bbbe; font-size: 0.95rem; text-align: center; margin-bottom: 2rem; }
.panel {
    background: #131519;
    border-radius: 12px;
    box-shadow: 7px 7px 14px #0a0b0d, -7px -7px 14px #1c1f25;
    border: 1px solid rgba(255,255,255,0.02);
    padding: 20px;
    margin-bottom: 30px;
    color: #949BA4;
    text-align: center;
    font-size: 0.9rem;
}
.card {
    background: rgba(255,255,255,0.02);
    border: 1px solid rgba(255,255,255,0.05);
    border-radius: 16px;
    padding: 24px;
    margin-bottom: 24px;
}
form.row { display: flex; gap: 16px; align-items: flex-start; }
form.row > .field { flex: 3; }
form.row > .action { flex: 1; }
textarea, input[type=text] {
    box-sizing: border-box;
    width: 100%;
    background-color: #0a0a0a;
    color: #ffffff;
    border: 2px solid #2f3136;
    border-radius: 12px;
    padding: 10px;
    font-family: Consolas, monospace;
    transition: all 0.4s ease-in-out;
}
textarea:focus, input[type=text]:focus {
    outline: none;
    border-color: #5865F2;
    box-shadow: 0 0 25px rgba(88,101,242,0.35);
    background-color: #101014;
}
button, a.button {
    display: inline-block;
    box-sizing: border-box;
    width: 100%;
    height: 50px;
    line-height: 50px;
    text-align: center;
    text-decoration: none;
    background: linear-gradient(90deg, #5865F2, #9B84EC);
    color: white;
    font-weight: 700;
    border: none;
    border-radius: 10px;
    text-transform: uppercase;
    letter-spacing: 1px;
    cursor: pointer;
    box-shadow: 0 4px 15px rgba(88,101,242,0.3);
    transition: all 0.3s cubic-bezier(0.25, 0.8, 0.25, 1);
}
button:hover, a.button:hover { transform: translateY(-3px); box-shadow: 0 8px 25px rgba(155,132,236,0.5); }
.hint { text-align: center; margin-top: 10px; opacity: 0.5; font-size: 10px; }
.notice { border-radius: 10px; padding: 12px 16px; margin-bottom: 16px; }
.notice.error { background: rgba(237,66,69,0.15); border: 1px solid #ed4245; }
.notice.warning { background: rgba(250,166,26,0.15); border: 1px solid #faa61a; }
.notice.success { background: rgba(87,242,135,0.12); border: 1px solid #57f287; }
.notice.info { background: rgba(88,101,242,0.12); border: 1px solid #5865F2; }
progress { width: 100%; display: none; }
table { width: 100%; border-collapse: collapse; margin-bottom: 16px; }
th, td { padding: 8px; border-bottom: 1px solid #2f3136; text-align: left; font-size: 0.9rem; }
td img { width: 40px; height: 40px; border-radius: 50%; }
pre { background: #0a0a0a; border-radius: 10px; padding: 12px; overflow-x: auto; }
footer { margin-top: 40px; text-align: center; opacity: 0.3; font-size: 11px; }
"#;

const PROGRESS_SCRIPT: &str = r#"
document.getElementById('batch-form').addEventListener('submit', function () {
    var bar = document.getElementById('batch-progress');
    bar.style.display = 'block';
    setInterval(function () {
        fetch(bar.dataset.endpoint)
            .then(function (r) { return r.json(); })
            .then(function (body) {
                var p = body.resp_data;
                if (p && p.total > 0) { bar.max = p.total; bar.value = p.completed; }
            })
            .catch(function () {});
    }, 500);
});
"#;

#[derive(Debug, Clone)]
pub enum Notice {
    Error(String),
    Warning(String),
    Success(String),
    Info(String),
}

impl Notice {
    fn class(&self) -> &'static str {
        match self {
            Notice::Error(_) => "error",
            Notice::Warning(_) => "warning",
            Notice::Success(_) => "success",
            Notice::Info(_) => "info",
        }
    }

    fn text(&self) -> &str {
        match self {
            Notice::Error(text)
            | Notice::Warning(text)
            | Notice::Success(text)
            | Notice::Info(text) => text,
        }
    }
}

#[derive(Debug, Default)]
pub struct PageView<'a> {
    pub configured: bool,
    pub api_base: &'a str,
    pub raw_input: &'a str,
    pub single_input: &'a str,
    pub notices: Vec<Notice>,
    pub results: Option<(Uuid, &'a [ResultRecord])>,
    pub profile: Option<&'a UserProfile>,
}

pub fn render(view: &PageView<'_>) -> String {
    let mut html = String::with_capacity(8 * 1024);
    html.push_str(&format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>Discord ID Resolver</title><style>{}</style></head><body><main>",
        STYLE
    ));
    html.push_str("<h1>⚡ Discord ID Resolver</h1>");
    html.push_str("<p class=\"subtitle\">把原始 ID 转换为真实的用户身份。</p>");

    for notice in &view.notices {
        render_notice(&mut html, notice);
    }

    if !view.configured {
        html.push_str(
            "<div class=\"card\"><p>在项目目录下创建 secrets 文件，内容如下：</p>\
             <pre>[discord]\ntoken = \"YOUR_BOT_TOKEN\"</pre></div>",
        );
    } else {
        render_forms(&mut html, view);
        if let Some((batch_id, records)) = view.results {
            render_results(&mut html, batch_id, records);
        }
        if let Some(profile) = view.profile {
            render_profile(&mut html, profile);
        }
    }

    html.push_str("<footer>POWERED BY AXUM &amp; DISCORD API</footer></main>");
    if view.configured {
        html.push_str(&format!("<script>{}</script>", PROGRESS_SCRIPT));
    }
    html.push_str("</body></html>");
    html
}

fn render_notice(html: &mut String, notice: &Notice) {
    html.push_str(&format!(
        "<div class=\"notice {}\">{}</div>",
        notice.class(),
        escape_html(notice.text())
    ));
}

fn render_forms(html: &mut String, view: &PageView<'_>) {
    html.push_str(
        "<div class=\"panel\"><strong>系统就绪。</strong><br>\
         <span style=\"opacity: 0.7;\">在下方粘贴 ID，空白和无效文本会被自动过滤。</span></div>",
    );

    html.push_str(&format!(
        "<div class=\"card\"><h3>📥 Target List</h3>\
         <form id=\"batch-form\" class=\"row\" method=\"post\" action=\"/lookup\">\
         <div class=\"field\"><textarea name=\"ids\" rows=\"7\" \
         placeholder=\"262745192195624256&#10;8923472384423894&#10;...\">{}</textarea></div>\
         <div class=\"action\"><button type=\"submit\">开始</button>\
         <div class=\"hint\">SAFE RATE LIMIT</div></div></form>\
         <progress id=\"batch-progress\" value=\"0\" max=\"1\" data-endpoint=\"{}/progress\"></progress></div>",
        escape_html(view.raw_input),
        escape_html(view.api_base)
    ));

    html.push_str(&format!(
        "<div class=\"card\"><h3>🔎 单个查询</h3>\
         <form class=\"row\" method=\"post\" action=\"/search\">\
         <div class=\"field\"><input type=\"text\" name=\"user_id\" maxlength=\"20\" \
         placeholder=\"123456789012345678\" value=\"{}\"></div>\
         <div class=\"action\"><button type=\"submit\">查询</button></div></form></div>",
        escape_html(view.single_input)
    ));
}

// 列顺序固定：头像、用户名、ID、日期、显示名
fn render_results(html: &mut String, batch_id: Uuid, records: &[ResultRecord]) {
    html.push_str(
        "<div class=\"card\"><table><thead><tr>\
         <th>Avatar</th><th>User</th><th>ID</th><th>Data</th><th>Display Name</th>\
         </tr></thead><tbody>",
    );
    for record in records {
        let avatar = match &record.avatar_url {
            Some(url) => format!("<img src=\"{}\" alt=\"\">", escape_html(url)),
            None => String::new(),
        };
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            record.status.as_str(),
            avatar,
            escape_html(&record.username),
            escape_html(&record.id),
            escape_html(record.created_at_fmt.as_deref().unwrap_or("")),
            escape_html(record.global_name.as_deref().unwrap_or("")),
        ));
    }
    html.push_str(&format!(
        "</tbody></table><a class=\"button\" href=\"/export/{}\">📥 下载 CSV</a></div>",
        batch_id
    ));
}

fn render_profile(html: &mut String, profile: &UserProfile) {
    let json = serde_json::to_string_pretty(profile).unwrap_or_default();
    html.push_str(&format!("<div class=\"card\"><pre>{}</pre>", escape_html(&json)));
    if profile.has_avatar {
        html.push_str(&format!(
            "<figure><img src=\"{}\" width=\"100\" alt=\"\"><figcaption>{}</figcaption></figure>",
            escape_html(&profile.avatar_url),
            escape_html(&profile.username)
        ));
    }
    html.push_str("</div>");
}
