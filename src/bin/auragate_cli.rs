//!
//! auragate CLI binary
//! -------------------
//! Command-line tool and interactive interpreter for an event-operations
//! deployment: log in, then submit scanned payloads against gate entry/exit
//! or attendance/ID endpoints and render the typed outcome.

use std::env;
use std::io::{self, Write};

use anyhow::{anyhow, Result};

use auragate::scan::{Checkpoint, EventEndpoint, GateAction, Operation, ScanOutcome};
use auragate::{Config, OperatorClient};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} --login <user> <password> [--base <url>]\n  {program} --logout\n  {program} --status\n  {program} --gate <checkpoint> <entry|exit> --payload <data>\n  {program} --event <mark|unmark|collect|return> <registrationId> <userId> <eventId> --payload <data>\n  {program} --repl\n\nFlags:\n  --base <url>             API base URL (overrides AURAGATE_BASE_URL)\n  --payload <data>         Raw scanner payload (bare identifier or JSON with a token field)\n  --repl                   Start interactive mode\n  -h, --help               Show this help\n\nInteractive commands:\n  login <user> <password>                      authenticate and cache the session\n  logout                                       erase the cached session\n  status                                       show who is logged in\n  gate <checkpoint> <entry|exit> <payload>     scan at a gate (main-gate | concert-area)\n  event <kind> <regId> <userId> <eventId> <payload>   attendance/ID action (mark|unmark|collect|return)\n  help                                         show this help\n  quit | exit                                  exit the interpreter\n\nExamples:\n  {program} --login gate7 s3cret --base https://ops.example.org/api/\n  {program} --gate main-gate entry --payload GIT2023-0042\n  {program} --event mark r-17 u-3 e-9 --payload '{{\"token\":\"abc\"}}'\n\nEnvironment:\n  AURAGATE_BASE_URL, AURAGATE_TIMEOUT_SECS, AURAGATE_KEYRING_SERVICE, AURAGATE_KEYRING_ACCOUNT"
    );
}

fn render_outcome(outcome: &ScanOutcome) {
    match outcome {
        ScanOutcome::PersonMatched { name, organization, sub_organization, year, section, uid, secondary_id, message, .. } => {
            println!("ACCEPTED: {message}");
            println!("  name: {name}");
            if !organization.is_empty() { println!("  organization: {organization}"); }
            if !sub_organization.is_empty() { println!("  department: {sub_organization}"); }
            if let Some(y) = year { println!("  year: {y}"); }
            if let Some(s) = section { println!("  section: {s}"); }
            if !uid.is_empty() { println!("  uid: {uid}"); }
            if !secondary_id.is_empty() { println!("  usn: {secondary_id}"); }
        }
        ScanOutcome::FacultyMatched { message, attributes } => {
            println!("ACCEPTED (faculty): {message}");
            for (k, v) in attributes {
                println!("  {k}: {v}");
            }
        }
        ScanOutcome::Acknowledged { message, user_type } => {
            match user_type {
                Some(t) => println!("OK ({t}): {message}"),
                None => println!("OK: {message}"),
            }
        }
        ScanOutcome::Rejected { message, status } => {
            match status {
                Some(code) => println!("REJECTED [{code}]: {message}"),
                None => println!("REJECTED: {message}"),
            }
        }
        ScanOutcome::TransportFailure { reason } => {
            println!("NETWORK ERROR: {reason}");
        }
    }
}

fn main() -> Result<()> {
    // Initialize tracing subscriber so client-side warnings are visible on the command line
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let mut args: Vec<String> = env::args().collect();
    let program = args.remove(0);

    let mut base: Option<String> = None;
    let mut payload: Option<String> = None;
    let mut repl: bool = false;
    let mut login: Option<(String, String)> = None;
    let mut logout: bool = false;
    let mut status: bool = false;
    let mut gate: Option<(String, String)> = None;
    let mut event: Option<(String, String, String, String)> = None;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage(&program);
                return Ok(());
            }
            "--base" => {
                base = Some(args.get(i + 1).cloned().ok_or_else(|| anyhow!("--base requires a URL"))?);
                i += 2;
            }
            "--payload" => {
                payload = Some(args.get(i + 1).cloned().ok_or_else(|| anyhow!("--payload requires a value"))?);
                i += 2;
            }
            "--repl" => { repl = true; i += 1; }
            "--logout" => { logout = true; i += 1; }
            "--status" => { status = true; i += 1; }
            "--login" => {
                let user = args.get(i + 1).cloned().ok_or_else(|| anyhow!("--login requires <user> <password>"))?;
                let pass = args.get(i + 2).cloned().ok_or_else(|| anyhow!("--login requires <user> <password>"))?;
                login = Some((user, pass));
                i += 3;
            }
            "--gate" => {
                let checkpoint = args.get(i + 1).cloned().ok_or_else(|| anyhow!("--gate requires <checkpoint> <entry|exit>"))?;
                let action = args.get(i + 2).cloned().ok_or_else(|| anyhow!("--gate requires <checkpoint> <entry|exit>"))?;
                gate = Some((checkpoint, action));
                i += 3;
            }
            "--event" => {
                let kind = args.get(i + 1).cloned().ok_or_else(|| anyhow!("--event requires <kind> <regId> <userId> <eventId>"))?;
                let reg = args.get(i + 2).cloned().ok_or_else(|| anyhow!("--event requires <kind> <regId> <userId> <eventId>"))?;
                let user = args.get(i + 3).cloned().ok_or_else(|| anyhow!("--event requires <kind> <regId> <userId> <eventId>"))?;
                let ev = args.get(i + 4).cloned().ok_or_else(|| anyhow!("--event requires <kind> <regId> <userId> <eventId>"))?;
                event = Some((kind, reg, user, ev));
                i += 5;
            }
            other => {
                eprintln!("unknown argument: {other}");
                print_usage(&program);
                return Ok(());
            }
        }
    }

    let config = match &base {
        Some(b) => Config::with_base_url(b)?,
        None => Config::from_env()?,
    };
    let client = OperatorClient::connect(&config)?;
    let rt = tokio::runtime::Runtime::new()?;

    if let Some((user, pass)) = &login {
        match rt.block_on(client.login(user, pass)) {
            Ok(session) => println!("logged in as {} ({})", session.username, session.role),
            Err(e) => {
                eprintln!("login failed: {}", e.message());
                std::process::exit(1);
            }
        }
    }
    if logout {
        client.logout();
        println!("logged out");
    }
    if status {
        print_status(&client);
    }
    if let Some((checkpoint, action)) = &gate {
        let data = payload.clone().ok_or_else(|| anyhow!("--gate needs --payload <data>"))?;
        let op = Operation::Gate {
            checkpoint: Checkpoint::parse(checkpoint),
            action: GateAction::parse(action),
        };
        let outcome = rt.block_on(client.submit_scan(&data, &op));
        render_outcome(&outcome);
    }
    if let Some((kind, reg, user, ev)) = &event {
        let data = payload.clone().ok_or_else(|| anyhow!("--event needs --payload <data>"))?;
        let op = Operation::Event {
            registration_id: reg.clone(),
            user_id: user.clone(),
            event_id: ev.clone(),
            endpoint: EventEndpoint::parse(kind),
        };
        let outcome = rt.block_on(client.submit_scan(&data, &op));
        render_outcome(&outcome);
    }

    if repl {
        return run_repl(rt, client);
    }
    if login.is_none() && !logout && !status && gate.is_none() && event.is_none() {
        print_usage(&program);
    }
    Ok(())
}

fn print_status(client: &OperatorClient) {
    match client.session() {
        Some(s) if s.is_authenticated() => println!("logged in as {} ({})", s.username, s.role),
        _ => println!("not logged in"),
    }
}

fn run_repl(rt: tokio::runtime::Runtime, client: OperatorClient) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut input = String::new();
    println!("auragate interpreter. Type 'help' for commands.");
    loop {
        input.clear();
        print!("> ");
        let _ = stdout.flush();
        if stdin.read_line(&mut input).is_err() { break; }
        if input.is_empty() { break; } // EOF
        let line = input.trim();
        if line.is_empty() { continue; }
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0].to_lowercase().as_str() {
            "quit" | "exit" => break,
            "help" => print_usage("auragate_cli"),
            "status" => print_status(&client),
            "logout" => {
                client.logout();
                println!("logged out");
            }
            "login" => {
                if parts.len() < 3 { eprintln!("usage: login <user> <password>"); continue; }
                match rt.block_on(client.login(parts[1], parts[2])) {
                    Ok(session) => println!("logged in as {} ({})", session.username, session.role),
                    Err(e) => eprintln!("login failed: {}", e.message()),
                }
            }
            "gate" => {
                if parts.len() < 4 { eprintln!("usage: gate <checkpoint> <entry|exit> <payload>"); continue; }
                let op = Operation::Gate {
                    checkpoint: Checkpoint::parse(parts[1]),
                    action: GateAction::parse(parts[2]),
                };
                let data = parts[3..].join(" ");
                let outcome = rt.block_on(client.submit_scan(&data, &op));
                render_outcome(&outcome);
            }
            "event" => {
                if parts.len() < 6 { eprintln!("usage: event <mark|unmark|collect|return> <regId> <userId> <eventId> <payload>"); continue; }
                let op = Operation::Event {
                    registration_id: parts[2].to_string(),
                    user_id: parts[3].to_string(),
                    event_id: parts[4].to_string(),
                    endpoint: EventEndpoint::parse(parts[1]),
                };
                let data = parts[5..].join(" ");
                let outcome = rt.block_on(client.submit_scan(&data, &op));
                render_outcome(&outcome);
            }
            other => eprintln!("unknown command: {other} (try 'help')"),
        }
    }
    Ok(())
}
