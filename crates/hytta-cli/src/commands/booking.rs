//! Booking subcommands: CRUD against the local store plus conflict checks.

use chrono::NaiveDate;
use clap::Subcommand;
use hytta_core::{find_conflicts, Booking, BookingDb, DateInterval, OverlapKind};

/// Booking actions.
#[derive(Subcommand)]
pub enum BookingAction {
    /// Add a booking
    Add {
        /// Booking title
        title: String,
        /// Family member making the booking
        #[arg(long)]
        member: String,
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: String,
        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        to: String,
        /// Add even if the period conflicts with existing bookings
        #[arg(long)]
        force: bool,
    },
    /// List bookings
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a booking by id
    Remove {
        /// Booking id
        id: String,
    },
    /// Check a candidate period for conflicts
    Check {
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: String,
        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        to: String,
        /// Ignore one booking id (the one being edited)
        #[arg(long)]
        exclude: Option<String>,
    },
}

/// Run the booking command.
pub fn run(action: BookingAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = BookingDb::open_default()?;
    match action {
        BookingAction::Add {
            title,
            member,
            from,
            to,
            force,
        } => add_booking(&db, &title, &member, &from, &to, force),
        BookingAction::List { json } => list_bookings(&db, json),
        BookingAction::Remove { id } => {
            db.remove(&id)?;
            println!("Removed booking {id}");
            Ok(())
        }
        BookingAction::Check { from, to, exclude } => {
            check_period(&db, &from, &to, exclude.as_deref())
        }
    }
}

fn add_booking(
    db: &BookingDb,
    title: &str,
    member: &str,
    from: &str,
    to: &str,
    force: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let interval = parse_interval(from, to)?;
    let others: Vec<Booking> = db.list()?.iter().map(|r| r.to_booking()).collect();
    let conflicts = find_conflicts(&interval, &others, None)?;

    if !conflicts.is_empty() && !force {
        println!("Refusing to add: {} conflicting booking(s).", conflicts.len());
        print_conflicts(&conflicts);
        println!("Re-run with --force to book anyway.");
        return Ok(());
    }

    let record = db.insert(title, member, interval)?;
    println!("Added booking {} ({} .. {})", record.id, from, to);
    Ok(())
}

fn list_bookings(db: &BookingDb, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let records = db.list()?;
    if json {
        let bookings: Vec<Booking> = records.iter().map(|r| r.to_booking()).collect();
        println!("{}", serde_json::to_string_pretty(&bookings)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No bookings.");
        return Ok(());
    }
    for record in records {
        println!(
            "{}  {} .. {}  {:<20} ({})",
            record.id,
            record.interval.start.format("%Y-%m-%d"),
            record.interval.end.format("%Y-%m-%d"),
            record.title,
            record.member,
        );
    }
    Ok(())
}

fn check_period(
    db: &BookingDb,
    from: &str,
    to: &str,
    exclude: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let interval = parse_interval(from, to)?;
    let others: Vec<Booking> = db.list()?.iter().map(|r| r.to_booking()).collect();
    let conflicts = find_conflicts(&interval, &others, exclude)?;

    if conflicts.is_empty() {
        println!("No conflicts: {from} .. {to} is free.");
    } else {
        println!("{} conflict(s):", conflicts.len());
        print_conflicts(&conflicts);
    }
    Ok(())
}

fn print_conflicts(conflicts: &[hytta_core::ConflictRecord]) {
    for conflict in conflicts {
        println!(
            "  {} ({} .. {}): candidate {}",
            conflict.title,
            conflict.start.format("%Y-%m-%d"),
            conflict.end.format("%Y-%m-%d"),
            describe_kind(conflict.kind),
        );
    }
}

fn describe_kind(kind: OverlapKind) -> &'static str {
    match kind {
        OverlapKind::ContainsExisting => "covers the whole booking",
        OverlapKind::ContainedByExisting => "lies inside the booking",
        OverlapKind::OverlapsStart => "starts during the booking",
        OverlapKind::OverlapsEnd => "runs into the booking",
    }
}

/// Parse YYYY-MM-DD day bounds into a closed interval: start of the
/// first day through end of the last day, UTC.
fn parse_interval(from: &str, to: &str) -> Result<DateInterval, Box<dyn std::error::Error>> {
    let start = parse_day(from)?
        .and_hms_opt(0, 0, 0)
        .ok_or("invalid start time")?
        .and_utc();
    let end = parse_day(to)?
        .and_hms_opt(23, 59, 59)
        .ok_or("invalid end time")?
        .and_utc();
    Ok(DateInterval::new(start, end)?)
}

fn parse_day(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{s}'. Expected YYYY-MM-DD"))
}
