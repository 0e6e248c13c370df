//! Headless LIGHTSPEED peer.
//!
//! `lightspeed host` waits for a peer on `LIGHTSPEED_PORT`;
//! `lightspeed join <addr>` connects to a host. Each side places one ship
//! of every class, readies, and then fires at whatever it can see until
//! the match is decided.

use std::env;
use std::net::TcpListener;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use lightspeed_core::enums::ShipClass;
use lightspeed_core::orders::Order;
use lightspeed_core::units::S;
use lightspeed_link::config;
use lightspeed_link::session::wall_clock_ms;
use lightspeed_link::{Connection, LinkResult, Session};

/// Time between volleys of the autopilot.
const VOLLEY_INTERVAL: f64 = 2.0 * S;

/// Spacing between placed ships.
const FORMATION_SPACING: f64 = 200.0;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let link = match args.as_slice() {
        [cmd] if cmd == "host" => host(),
        [cmd, addr] if cmd == "join" => {
            Connection::connect(addr.as_str(), config::inbox_capacity())
        }
        _ => {
            eprintln!("usage: lightspeed host | lightspeed join <addr:port>");
            return ExitCode::from(2);
        }
    };

    match link {
        Ok((connection, inbox)) => {
            let mut session = Session::new(connection, inbox, wall_clock_ms());
            run(&mut session);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "could not establish link");
            ExitCode::FAILURE
        }
    }
}

fn host() -> LinkResult<(Connection, lightspeed_link::inbox::Inbox)> {
    let port = config::port();
    let listener = TcpListener::bind(("0.0.0.0", port))?;
    info!(port, "waiting for a peer");
    Connection::accept(&listener, config::seed(), config::inbox_capacity())
}

fn run(session: &mut Session) {
    deploy(session);

    let interval = config::frame_interval();
    let mut next_frame = Instant::now();
    let mut next_volley = wall_clock_ms();
    let mut phase = session.battlefield().phase();

    while session.battlefield().active() {
        let now = wall_clock_ms();
        session.frame(now);

        let current = session.battlefield().phase();
        if current != phase {
            info!(?current, "phase changed");
            phase = current;
        }
        if let Some(message) = session.take_message() {
            info!(%message, "battlefield message");
        }
        if session.battlefield().started() && now >= next_volley {
            volley(session, now);
            next_volley = now + VOLLEY_INTERVAL;
        }

        next_frame += interval;
        let after = Instant::now();
        if next_frame > after {
            thread::sleep(next_frame - after);
        } else if after - next_frame > interval * 2 {
            // Too far behind; skip the missed frames.
            next_frame = after;
        }
    }

    info!(
        outcome = ?session.battlefield().outcome(),
        linked = session.is_linked(),
        "match over"
    );
    // Let the last orders flush before the connection drops.
    thread::sleep(Duration::from_millis(100));
}

/// Place one ship of every class across the middle of the local region,
/// then declare ready.
fn deploy(session: &mut Session) {
    let bf = session.battlefield();
    let team = bf.local_team();
    let Some(center) = bf.region().and_then(|r| r.as_region()).map(|r| r.center()) else {
        warn!("no placement region; skipping deployment");
        return;
    };

    for (i, class) in ShipClass::ALL.into_iter().enumerate() {
        let x = center.x + (i as f64 - 1.0) * FORMATION_SPACING;
        let order = Order::place(team, class, x, center.y, wall_clock_ms());
        if let Err(reason) = session.issue(order) {
            warn!(%reason, ?class, "placement refused");
        }
    }
    if let Err(reason) = session.issue(Order::ready(team, wall_clock_ms())) {
        warn!(%reason, "ready refused");
    }
}

/// Every living local ship shoots at the nearest enemy it can see.
fn volley(session: &mut Session, now: f64) {
    let bf = session.battlefield();
    let local = bf.local_team();

    let targets: Vec<_> = bf
        .ships()
        .filter(|body| body.team() == Some(local.opponent()))
        .filter_map(|body| {
            let seen = bf.observed_time(body, now);
            body.exists_at(seen).then(|| body.position_at(seen))
        })
        .collect();

    let shots: Vec<Order> = bf
        .ships()
        .filter(|body| body.team() == Some(local) && body.exists_at(now))
        .filter_map(|body| {
            let id = body.as_ship()?.id();
            let from = body.position_at(now);
            let target = targets
                .iter()
                .min_by(|a, b| from.distance(**a).total_cmp(&from.distance(**b)))?;
            Some(Order::shoot(id, target.x, target.y, now))
        })
        .collect();

    for shot in shots {
        if let Err(reason) = session.issue(shot) {
            warn!(%reason, ship = shot.ship, "shot refused");
        }
    }
}
