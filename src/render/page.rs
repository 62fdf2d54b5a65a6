//! Chat page: shell, sidebar, message list and input form.

use crate::session::{Message, MessageContent, Role, Session, SessionSummary};

use super::{ResultView, escape_html};

/// Everything needed to render the chat page.
#[derive(Debug, Clone, Copy)]
pub struct ChatPage<'a> {
    /// Sidebar entries, oldest first.
    pub sessions: &'a [SessionSummary],
    /// Session shown in the main area.
    pub active: &'a Session,
    /// Whether the active session is waiting on the backend.
    pub pending: bool,
    pub dark_mode: bool,
}

impl ChatPage<'_> {
    /// Render the full HTML document.
    #[must_use]
    pub fn render(&self) -> String {
        let content = format!(
            r#"<div class="chat-layout">
    {sidebar}
    <div class="sidebar-overlay"></div>
    <div class="chat-shell">
        {header}
        <div id="chat-messages" class="chat-messages" aria-live="polite" aria-label="Chat messages">
{messages}
            <div id="chat-end"></div>
        </div>
        {input}
    </div>
</div>"#,
            sidebar = self.sidebar(),
            header = self.header(),
            messages = message_list(&self.active.messages),
            input = input_area(self.pending),
        );

        html_shell(&self.active.title, &content, self.dark_mode, self.pending)
    }

    fn sidebar(&self) -> String {
        let entries = self
            .sessions
            .iter()
            .map(sidebar_entry)
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<aside id="sidebar" class="sidebar">
        <h2 class="sidebar-title">Chat History</h2>
        <form method="post" action="/sessions">
            <button type="submit" class="button primary new-chat">✨ New Chat</button>
        </form>
        <ul class="session-list">
{entries}
        </ul>
    </aside>"#
        )
    }

    fn header(&self) -> String {
        let theme_label = if self.dark_mode { "🌞 Light" } else { "🌙 Dark" };

        format!(
            r#"<header class="chat-header">
            <div class="chat-heading">
                <button type="button" class="button sidebar-toggle" aria-controls="sidebar" aria-expanded="false" title="Chat history">☰</button>
                <h1 class="chat-title">{title}</h1>
            </div>
            <div class="chat-actions">
                <a class="button" href="/sessions/{id}/export" target="_blank" rel="noopener">📄 Export</a>
                <form method="post" action="/preferences/theme">
                    <button type="submit" class="button">{theme_label}</button>
                </form>
            </div>
        </header>"#,
            title = escape_html(&self.active.title),
            id = self.active.id,
        )
    }
}

fn sidebar_entry(summary: &SessionSummary) -> String {
    let title = escape_html(&summary.title);
    let active_class = if summary.active { " active" } else { "" };

    format!(
        r#"            <li class="session-entry{active_class}">
                <form method="post" action="/sessions/{id}/activate" class="session-open">
                    <button type="submit">
                        <span class="session-name">{title}</span>
                        <span class="session-count">{count} messages</span>
                    </button>
                </form>
                <form method="post" action="/sessions/{id}/rename" class="session-rename" data-current="{title}">
                    <input type="hidden" name="title" value="{title}">
                    <button type="submit" title="Rename">✏️</button>
                </form>
                <form method="post" action="/sessions/{id}/delete" class="session-delete">
                    <button type="submit" title="Delete">🗑️</button>
                </form>
            </li>"#,
        id = summary.id,
        count = summary.message_count,
    )
}

fn message_list(messages: &[Message]) -> String {
    if messages.is_empty() {
        return r#"            <div class="chat-empty">
                <h3>Ready to Fact-Check</h3>
                <p>Ask me anything and I'll verify the facts for you!</p>
            </div>"#
            .to_string();
    }

    messages
        .iter()
        .map(render_message)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render one message bubble, including its copy button.
fn render_message(message: &Message) -> String {
    let role_class = match message.role {
        Role::User => "user",
        Role::Bot => "bot",
    };

    let body = match (&message.role, &message.content) {
        (Role::Bot, MessageContent::FactCheck(result)) => ResultView::new(result).to_html(),
        (_, MessageContent::FactCheck(result)) => escape_html(&result.claim),
        (_, MessageContent::Text(text)) => {
            format!(r#"<div class="message-text">{}</div>"#, escape_html(text))
        }
    };

    format!(
        r#"            <div class="message {role_class}">
                <button type="button" class="copy-button" title="Copy to clipboard" data-copy="{copy}">📋</button>
                {body}
            </div>"#,
        copy = escape_html(&message.copy_text()),
    )
}

fn input_area(pending: bool) -> String {
    let (disabled, status) = if pending {
        (" disabled", r#"<p class="chat-status">Verifying...</p>"#)
    } else {
        ("", "")
    };

    format!(
        r#"<div class="chat-input">
            {status}
            <form id="chat-form" method="post" action="/chat">
                <textarea name="message" rows="1" placeholder="Ask a fact-checking question..."{disabled}></textarea>
                <button type="submit" class="button primary send"{disabled} title="Send">➤</button>
            </form>
            <p class="chat-hint">Press Enter to send, Shift+Enter for new line</p>
        </div>"#
    )
}

/// Generate the HTML shell for the application.
///
/// While a reply is outstanding the page reloads itself every second.
fn html_shell(title: &str, content: &str, dark_mode: bool, pending: bool) -> String {
    let theme = if dark_mode { "dark" } else { "light" };
    let refresh = if pending {
        "\n    <meta http-equiv=\"refresh\" content=\"1\">"
    } else {
        ""
    };
    let title = escape_html(title);

    format!(
        r#"<!DOCTYPE html>
<html lang="en" class="{theme}">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Chat-based claim verification">{refresh}
    <title>{title} - Fact Checker</title>
    <style>{STYLES}</style>
</head>
<body>
{content}
<script>{SCRIPT}</script>
</body>
</html>"#
    )
}

const STYLES: &str = r"
:root { --bg: #f5f7ff; --panel: #ffffff; --text: #1f2937; --muted: #6b7280; --border: #e5e7eb; --primary: #4f46e5; }
html.dark { --bg: #0f172a; --panel: #1e293b; --text: #f1f5f9; --muted: #94a3b8; --border: #334155; }
* { box-sizing: border-box; }
body { margin: 0; font-family: 'Segoe UI', Arial, sans-serif; background: var(--bg); color: var(--text); }
.chat-layout { display: flex; height: 100vh; }
.sidebar { width: 20rem; padding: 1rem; background: var(--panel); border-right: 1px solid var(--border); overflow-y: auto; }
.session-list { list-style: none; padding: 0; }
.session-entry { display: flex; gap: .25rem; align-items: center; border-radius: .75rem; margin-bottom: .25rem; }
.session-entry.active { background: var(--primary); color: #fff; }
.session-entry button { background: none; border: 0; color: inherit; cursor: pointer; }
.session-open { flex: 1; }
.session-open button { display: flex; flex-direction: column; align-items: flex-start; width: 100%; padding: .5rem; }
.session-count { font-size: .75rem; opacity: .7; }
.chat-shell { flex: 1; display: flex; flex-direction: column; min-width: 0; }
.chat-header { display: flex; justify-content: space-between; align-items: center; padding: .75rem 1.5rem; border-bottom: 1px solid var(--border); }
.chat-heading { display: flex; gap: .75rem; align-items: center; min-width: 0; }
.chat-title { font-size: 1.1rem; margin: 0; }
.chat-actions { display: flex; gap: .5rem; }
.button { padding: .5rem 1rem; border-radius: .75rem; border: 1px solid var(--border); background: var(--panel); color: var(--text); cursor: pointer; text-decoration: none; font-size: .9rem; }
.button.primary { background: var(--primary); color: #fff; border-color: var(--primary); }
.chat-messages { flex: 1; overflow-y: auto; padding: 1.5rem; }
.chat-empty { text-align: center; color: var(--muted); margin-top: 20vh; }
.message { position: relative; max-width: 48rem; padding: 1rem 2.5rem 1rem 1rem; border-radius: 1rem; margin-bottom: 1rem; }
.message.user { margin-left: auto; background: var(--primary); color: #fff; }
.message.bot { margin-right: auto; background: var(--panel); border: 1px solid var(--border); }
.message-text { white-space: pre-wrap; }
.copy-button { position: absolute; top: .5rem; right: .5rem; background: none; border: 0; cursor: pointer; }
.result-card, .stat-card, .evidence-group { border-radius: .75rem; padding: 1rem; margin-bottom: .75rem; border: 1px solid var(--border); }
.result-stats { display: grid; grid-template-columns: 1fr 1fr; gap: .75rem; }
.stat-card { color: #fff; }
.stat-card.confidence { background: #6366f1; }
.stat-value { font-size: 1.75rem; font-weight: 700; }
.tier-excellent { background: linear-gradient(90deg, #4ade80, #059669); }
.tier-good { background: linear-gradient(90deg, #facc15, #f97316); }
.tier-fair { background: linear-gradient(90deg, #fb923c, #ef4444); }
.tier-poor { background: linear-gradient(90deg, #f87171, #db2777); }
.evidence-group-header { display: flex; gap: .5rem; align-items: center; }
.evidence-group-header h4 { margin: 0; flex: 1; }
.badge { font-size: .75rem; padding: .1rem .6rem; border-radius: 999px; background: var(--bg); }
.evidence-supporting { border-left: 4px solid #10b981; }
.evidence-contradicting { border-left: 4px solid #ef4444; }
.evidence-neutral { border-left: 4px solid #f59e0b; }
.evidence-card { padding: .75rem; border-radius: .5rem; background: var(--bg); margin-top: .5rem; }
.evidence-title { font-weight: 600; }
.evidence-snippet { font-size: .9rem; color: var(--muted); margin: .25rem 0 .5rem; }
.evidence-meta { display: flex; gap: 1rem; font-size: .75rem; align-items: center; flex-wrap: wrap; }
.evidence-link { margin-left: auto; color: var(--primary); }
.evidence-empty { text-align: center; color: var(--muted); padding: 1.5rem 0; }
.chat-input { padding: 1rem 1.5rem; border-top: 1px solid var(--border); }
.chat-input form { display: flex; gap: .75rem; }
.chat-input textarea { flex: 1; min-height: 60px; max-height: 200px; padding: .75rem; border-radius: .75rem; border: 1px solid var(--border); background: var(--panel); color: var(--text); resize: none; }
.chat-hint, .chat-status { font-size: .75rem; color: var(--muted); text-align: center; }
.sidebar-toggle, .sidebar-overlay { display: none; }
@media (max-width: 768px) {
  .sidebar-toggle { display: inline-block; }
  .sidebar { display: none; position: fixed; top: 0; bottom: 0; left: 0; z-index: 20; max-width: 85vw; }
  .chat-layout.sidebar-open .sidebar { display: block; }
  .chat-layout.sidebar-open .sidebar-overlay { display: block; position: fixed; inset: 0; z-index: 10; background: rgba(0, 0, 0, .5); }
}
";

const SCRIPT: &str = r"
document.getElementById('chat-end')?.scrollIntoView({ behavior: 'smooth' });
document.querySelectorAll('.copy-button').forEach((button) => {
  button.addEventListener('click', () => {
    navigator.clipboard.writeText(button.dataset.copy)
      .then(() => alert('Copied to clipboard!'))
      .catch(() => alert('Failed to copy.'));
  });
});
const layout = document.querySelector('.chat-layout');
const toggle = document.querySelector('.sidebar-toggle');
const setSidebar = (open) => {
  layout?.classList.toggle('sidebar-open', open);
  toggle?.setAttribute('aria-expanded', String(open));
};
toggle?.addEventListener('click', () => setSidebar(!layout.classList.contains('sidebar-open')));
document.querySelector('.sidebar-overlay')?.addEventListener('click', () => setSidebar(false));
document.querySelectorAll('.session-rename').forEach((form) => {
  form.addEventListener('submit', (event) => {
    const title = prompt('Enter new chat title:', form.dataset.current);
    if (title === null || !title.trim()) { event.preventDefault(); return; }
    form.querySelector('[name=title]').value = title;
  });
});
const chatForm = document.getElementById('chat-form');
const textarea = chatForm?.querySelector('textarea');
const send = chatForm?.querySelector('button');
const sync = () => { if (send && !textarea.disabled) send.disabled = !textarea.value.trim(); };
textarea?.addEventListener('input', sync);
textarea?.addEventListener('keydown', (event) => {
  if (event.key === 'Enter' && !event.shiftKey) {
    event.preventDefault();
    if (textarea.value.trim()) chatForm.requestSubmit();
  }
});
sync();
textarea?.focus();
";
