use {
    anyhow::{Context, Result, bail},
    chrono::{Local, NaiveDate},
    clap::{Args, Subcommand},
    convene_auth::AuthOutcome,
    convene_console::{DEFAULT_PAGE_SIZE, Notice, PageState, REQUEST_FAILED, load_page},
    convene_gateway::Operation,
    convene_operations::{
        Committee, Department, Event, Nullable, NullableExt, Page, PageQuery, User, Venue,
        analytics::Analytics,
        committees::Committees,
        departments::Departments,
        documents::{MyDocuments, author_label},
        events::{MyEvents, MyTodaysEvents, Timeline, TimelineMode},
        users::Users,
        venues::Venues,
    },
    serde::Serialize,
};

use crate::app::App;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and keep the session token.
    Login {
        email: String,
        #[arg(long, env = "CONVENE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the session and every recovery value.
    Logout,
    /// Show the identity behind the stored token.
    Whoami,
    /// Show whether a session is stored, without contacting the backend.
    Status,
    /// Request a one-time code for password recovery.
    ForgotPassword { email: String },
    /// Submit the one-time code received by email.
    VerifyOtp { otp: String },
    /// Set a new password using the recorded email and code.
    ChangePassword {
        #[arg(long, env = "CONVENE_NEW_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Users(ListArgs),
    Departments(ListArgs),
    Committees(ListArgs),
    Venues(ListArgs),
    /// Events you authored or attend.
    Events(ListArgs),
    /// Today's events.
    Today,
    /// Documents across your events.
    Documents,
    /// Calendar data around a date.
    Timeline {
        /// Day to centre on, `YYYY-MM-DD` (default: today).
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "month")]
        mode: TimelineMode,
    },
    /// Dashboard counters.
    Analytics,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Search key.
    #[arg(long)]
    search: Option<String>,
    #[arg(long, default_value_t = 1)]
    page: u64,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,
}

/// Run one command and return what to print.
pub async fn execute(app: &App, command: Command, json: bool) -> Result<String> {
    match command {
        Command::Login { email, password } => report(app.auth.login(&email, &password).await),
        Command::Logout => report(app.auth.logout()),
        Command::Whoami => {
            let user = app.auth.identity().await.context(REQUEST_FAILED)?;
            render(json, &user, user_line)
        },
        Command::Status => Ok(status(app)),
        Command::ForgotPassword { email } => report(app.auth.forgot_password(&email).await),
        Command::VerifyOtp { otp } => report(app.auth.verify_otp(&otp).await),
        Command::ChangePassword { password } => {
            report(app.auth.update_password(&password).await)
        },
        Command::Users(args) => list(app, args, json, |query| Users { query }, user_line).await,
        Command::Departments(args) => {
            list(app, args, json, |query| Departments { query }, |d: &Department| {
                named_line(d.id, text(&d.name))
            })
            .await
        },
        Command::Committees(args) => {
            list(app, args, json, |query| Committees { query }, |c: &Committee| {
                named_line(c.id, text(&c.name))
            })
            .await
        },
        Command::Venues(args) => {
            list(app, args, json, |query| Venues { query }, |v: &Venue| {
                let capacity = v.capacity.value().map(|c| format!(" ({c} seats)")).unwrap_or_default();
                format!("{}{capacity}", named_line(v.id, text(&v.name)))
            })
            .await
        },
        Command::Events(args) => list(app, args, json, |query| MyEvents { query }, event_line).await,
        Command::Today => {
            let page = fetch(app, &MyTodaysEvents).await?;
            render_page(json, &page, event_line)
        },
        Command::Documents => {
            let page = fetch(app, &MyDocuments).await?;
            render_page(json, &page, |d| {
                format!(
                    "{}  by {}",
                    named_line(d.id, text(&d.title)),
                    author_label(d.author.value())
                )
            })
        },
        Command::Timeline { date, mode } => {
            let fetch_date = date.unwrap_or_else(|| Local::now().date_naive());
            let out = fetch(app, &Timeline { fetch_date, mode }).await?;
            Ok(serde_json::to_string_pretty(&out.data)?)
        },
        Command::Analytics => {
            let summary = fetch(app, &Analytics).await?.data;
            render(json, &summary, |s| {
                let count =
                    |n: &Nullable<u64>| n.value().map_or_else(|| "-".to_string(), u64::to_string);
                format!(
                    "users        {}\ndepartments  {}\ncommittees   {}\nevents       {}\nvenues       {}",
                    count(&s.total_users),
                    count(&s.total_departments),
                    count(&s.total_committees),
                    count(&s.total_events),
                    count(&s.total_venues)
                )
            })
        },
    }
}

fn status(app: &App) -> String {
    let check = app.auth.check();
    let credentials = app.auth.credentials();
    let mut out = if check.authenticated {
        match credentials.identity() {
            Some(user) => format!("signed in as {}", user_line(&user)),
            None => "signed in".to_string(),
        }
    } else {
        format!("not signed in (next: {})", check.redirect_to)
    };
    if credentials.needs_reauth() {
        out.push_str("\nidentity check failed last time; consider signing in again");
    }
    out
}

/// Turn an auth flow result into output or a failing exit.
fn report(result: convene_auth::Result<AuthOutcome>) -> Result<String> {
    let notice = Notice::from_auth(&result);
    let outcome = result.context(REQUEST_FAILED)?;
    match notice {
        Notice::Redirect(target) => Ok(format!("ok (next: {target})")),
        Notice::Success(message) => Ok(message.unwrap_or_else(|| "ok".to_string())),
        Notice::Rejected(message) => match outcome.redirect_to {
            // A rejected code still moves the recovery flow forward.
            Some(target) => Ok(format!("{message} (next: {target})")),
            None => bail!(message),
        },
        Notice::RequestFailed => bail!(REQUEST_FAILED),
    }
}

async fn fetch<O: Operation>(app: &App, op: &O) -> Result<O::Output> {
    app.gateway.call(op).await.context(REQUEST_FAILED)
}

async fn list<T, O>(
    app: &App,
    args: ListArgs,
    json: bool,
    build: impl FnOnce(PageQuery) -> O,
    line: impl Fn(&T) -> String,
) -> Result<String>
where
    T: Serialize,
    O: Operation<Output = Page<T>>,
{
    let mut state = PageState::new(args.page_size);
    if let Some(key) = args.search {
        state.search(key);
    }
    state.go_to(args.page);
    load_page(&app.gateway, &mut state, build).await;
    if let Some(notice) = state.notice() {
        bail!("{notice}");
    }
    if json {
        return Ok(serde_json::to_string_pretty(state.items())?);
    }
    let mut lines: Vec<String> = state.items().iter().map(line).collect();
    lines.push(format!(
        "page {} of {}, {} items",
        state.page(),
        state.pages(),
        state.total()
    ));
    Ok(lines.join("\n"))
}

fn render<T: Serialize>(json: bool, value: &T, text: impl Fn(&T) -> String) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(text(value))
    }
}

fn render_page<T: Serialize>(json: bool, page: &Page<T>, line: impl Fn(&T) -> String) -> Result<String> {
    render(json, page, |page| {
        let mut lines: Vec<String> = page.results.iter().map(&line).collect();
        lines.push(format!("{} total", page.total));
        lines.join("\n")
    })
}

fn text(field: &Nullable<String>) -> Option<&str> {
    field.value().map(String::as_str)
}

fn named_line(id: i64, name: Option<&str>) -> String {
    format!("{id:>6}  {}", name.unwrap_or("(untitled)"))
}

fn user_line(user: &User) -> String {
    let name = user.display_name();
    match (text(&user.email), name.is_empty()) {
        (Some(email), false) => format!("{:>6}  {name} <{email}>", user.id),
        (Some(email), true) => format!("{:>6}  {email}", user.id),
        (None, _) => named_line(user.id, Some(&name)),
    }
}

fn event_line(event: &Event) -> String {
    let when = match (text(&event.start_time), text(&event.end_time)) {
        (Some(start), Some(end)) => format!("  {start} → {end}"),
        (Some(start), None) => format!("  {start}"),
        _ => String::new(),
    };
    format!("{}{when}", named_line(event.id, text(&event.title)))
}
