use maud::{html, Markup, DOCTYPE};

// Single-binary app: the stylesheet is embedded so there is no static
// file handling at all.
const STYLE: &str = "
    * { box-sizing: border-box; }
    body { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; margin: 0; background: #f4f4f5; color: #18181b; }
    header { display: flex; align-items: center; justify-content: space-between; padding: 12px 24px; background: #fff; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
    header h3 { margin: 0; }
    header nav ul { display: flex; gap: 16px; list-style: none; margin: 0; padding: 0; }
    header a { color: #18181b; text-decoration: none; font-weight: 500; }
    header a:hover { color: #e82127; }
    main.container { max-width: 1080px; margin: 0 auto; padding: 24px; }
    main.narrow { max-width: 560px; }
    .card { background: #fff; border-radius: 8px; padding: 16px 20px; margin-bottom: 16px; box-shadow: 0 1px 2px rgba(0,0,0,0.06); }
    .card h2, .card h3 { margin-top: 0; }
    .panel-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(280px, 1fr)); gap: 16px; }
    .kv-list { list-style: none; margin: 0; padding: 0; }
    .kv-list li { display: flex; justify-content: space-between; gap: 12px; padding: 4px 0; border-bottom: 1px solid #f1f1f1; }
    .kv-list .kv-label { color: #71717a; }
    .timeline { list-style: none; margin: 16px 0; padding: 0; display: flex; gap: 4px; }
    .timeline li { flex: 1; text-align: center; padding-top: 8px; border-top: 4px solid #d4d4d8; font-size: 0.85em; }
    .timeline li.stage-complete { border-top-color: #16a34a; }
    .timeline li.stage-active { border-top-color: #e82127; font-weight: 600; }
    .timeline .stage-meta { color: #71717a; display: block; }
    .progress-summary { color: #71717a; margin: 4px 0 0; }
    .image-strip { display: flex; gap: 8px; overflow-x: auto; padding: 8px 0; }
    .image-strip img { height: 120px; border-radius: 6px; background: #fff; }
    .task-card { border-left: 4px solid #d4d4d8; }
    .task-card.task-complete { border-left-color: #16a34a; }
    .task-card.task-waiting { border-left-color: #f59e0b; }
    .task-status { font-size: 0.85em; color: #71717a; }
    .blocker-table { width: 100%; border-collapse: collapse; }
    .blocker-table th, .blocker-table td { text-align: left; padding: 6px 8px; border-bottom: 1px solid #f1f1f1; }
    .order-header { display: flex; align-items: baseline; justify-content: space-between; flex-wrap: wrap; gap: 8px; }
    .order-status { color: #e82127; font-weight: 600; }
    .vin-table { width: 100%; border-collapse: collapse; font-size: 0.9em; }
    .vin-table td { padding: 4px 8px; border-bottom: 1px solid #f1f1f1; }
    .vin-table td:first-child { color: #71717a; }
    .btn { display: inline-block; background: #e82127; color: #fff; border: none; border-radius: 4px; padding: 8px 16px; font-size: 1em; cursor: pointer; text-decoration: none; }
    .notice { background: #dcfce7; border-radius: 6px; padding: 8px 12px; margin-bottom: 16px; }
    input[type=text], input[type=url] { width: 100%; padding: 8px; font-size: 1em; border: 1px solid #d4d4d8; border-radius: 4px; }
    label { display: block; margin: 12px 0 4px; font-weight: 500; }
";

pub fn desktop_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (maud::PreEscaped(STYLE)) }
            }
            body {
                header {
                    h3 { "Tesla Order Tracker" }
                    nav {
                        ul {
                            li { a href="/" { "Dashboard" } }
                            li { a href="/refresh" { "Refresh" } }
                            li { a href="/logout" { "Logout" } }
                        }
                    }
                }
                (content)
            }
        }
    }
}
