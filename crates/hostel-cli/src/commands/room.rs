//! Room and student commands

use crate::client::HostelClient;
use crate::error::{CliError, CliResult};
use crate::output::{self, colorize_status, print_success, OutputFormat};
use clap::Args;
use hostel_types::{HistoryEntry, OccupancyChange, Occupant, Room, RoomStatus, StudentAssignment};
use serde::Serialize;
use tabled::Tabled;

/// Address of a room
#[derive(Args, Debug, Clone)]
pub struct RoomAddress {
    /// Facility id
    pub hostel: String,
    /// Floor number
    pub floor: u32,
    /// Room id
    pub room: String,
}

/// Student details for a check-in
#[derive(Args, Debug, Clone)]
pub struct CheckInArgs {
    #[command(flatten)]
    pub address: RoomAddress,

    /// Student id
    #[arg(long)]
    pub student_id: String,

    /// Student name
    #[arg(long)]
    pub name: String,

    /// Course of study
    #[arg(long)]
    pub course: Option<String>,

    /// Year of study
    #[arg(long)]
    pub year: Option<u8>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,
}

impl CheckInArgs {
    fn occupant(&self) -> CliResult<Occupant> {
        let occupant = Occupant {
            student_id: self.student_id.trim().into(),
            name: self.name.trim().to_string(),
            course: self.course.clone(),
            year: self.year,
            checked_in_at: None,
            email: self.email.clone(),
            phone: self.phone.clone(),
        };
        occupant
            .validate()
            .map_err(|e| CliError::InvalidInput(e.to_string()))?;
        Ok(occupant)
    }
}

/// Table row for a history entry
#[derive(Debug, Serialize, Tabled)]
pub struct HistoryRow {
    #[tabled(rename = "TIME")]
    pub time: String,
    #[tabled(rename = "CHANGE")]
    pub change: String,
    #[tabled(rename = "DETAIL")]
    pub detail: String,
}

impl From<&HistoryEntry> for HistoryRow {
    fn from(entry: &HistoryEntry) -> Self {
        let detail = match &entry.change {
            OccupancyChange::CheckedIn { student_id, name }
            | OccupancyChange::CheckedOut { student_id, name } => format!("{} ({})", name, student_id),
            OccupancyChange::StatusChange { from, to } => format!("{} -> {}", from, to),
        };
        Self {
            time: entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            change: entry.change.kind().to_string(),
            detail,
        }
    }
}

/// Show one room, optionally with its history
pub async fn show(
    address: &RoomAddress,
    history: Option<usize>,
    client: &HostelClient,
    format: OutputFormat,
) -> CliResult<()> {
    let room = client
        .get_room(&address.hostel, address.floor, &address.room)
        .await?;
    let entries = match history {
        Some(limit) => Some(
            client
                .room_history(&address.hostel, address.floor, &address.room, limit)
                .await?,
        ),
        None => None,
    };

    match format {
        OutputFormat::Table => {
            print_room(&room);
            if let Some(entries) = entries {
                println!("\nHistory:");
                output::print_output(entries.iter().map(HistoryRow::from).collect(), format)?;
            }
            Ok(())
        }
        _ => match entries {
            Some(entries) => output::print_single(
                &serde_json::json!({ "room": room, "history": entries }),
                format,
            ),
            None => output::print_single(&room, format),
        },
    }
}

pub async fn check_in(args: &CheckInArgs, client: &HostelClient, format: OutputFormat) -> CliResult<()> {
    let occupant = args.occupant()?;
    let address = &args.address;
    let room = client
        .check_in(&address.hostel, address.floor, &address.room, &occupant)
        .await?;
    report(
        &room,
        &format!("Checked in {} to room {}", occupant.name, room.label),
        format,
    )
}

pub async fn check_out(
    address: &RoomAddress,
    student_id: &str,
    client: &HostelClient,
    format: OutputFormat,
) -> CliResult<()> {
    let room = client
        .check_out(&address.hostel, address.floor, &address.room, student_id)
        .await?;
    report(
        &room,
        &format!("Checked out {} from room {}", student_id, room.label),
        format,
    )
}

/// Reserve a room, or release a reservation
pub async fn reserve(
    address: &RoomAddress,
    release: bool,
    client: &HostelClient,
    format: OutputFormat,
) -> CliResult<()> {
    let status = if release {
        RoomStatus::Vacant
    } else {
        RoomStatus::Reserved
    };
    let room = client
        .set_status(&address.hostel, address.floor, &address.room, status)
        .await?;
    let verb = if release { "Released" } else { "Reserved" };
    report(&room, &format!("{} room {}", verb, room.label), format)
}

pub async fn find_student(student_id: &str, client: &HostelClient, format: OutputFormat) -> CliResult<()> {
    let assignment = client.find_student(student_id).await?;
    match format {
        OutputFormat::Table => {
            println!("Student:  {} ({})", assignment.occupant.name, assignment.occupant.student_id);
            println!("Hostel:   {}", assignment.facility);
            println!("Floor:    {}", assignment.floor);
            println!("Room:     {}", assignment.room_id);
            if let Some(at) = assignment.occupant.checked_in_at {
                println!("Since:    {}", at.format("%Y-%m-%d %H:%M"));
            }
            Ok(())
        }
        _ => output::print_single(&assignment, format),
    }
}

/// Table row for a student assignment
#[derive(Debug, Serialize, Tabled)]
pub struct StudentRow {
    #[tabled(rename = "STUDENT ID")]
    pub student_id: String,
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "EMAIL")]
    pub email: String,
    #[tabled(rename = "HOSTEL")]
    pub hostel: String,
    #[tabled(rename = "FLOOR")]
    pub floor: u32,
    #[tabled(rename = "ROOM")]
    pub room: String,
}

impl From<&StudentAssignment> for StudentRow {
    fn from(assignment: &StudentAssignment) -> Self {
        Self {
            student_id: assignment.occupant.student_id.to_string(),
            name: assignment.occupant.name.clone(),
            email: assignment.occupant.email.clone().unwrap_or_default(),
            hostel: assignment.facility.to_string(),
            floor: assignment.floor,
            room: assignment.room_id.to_string(),
        }
    }
}

/// List assigned students, optionally filtered by name, email or id
pub async fn list_students(
    query: Option<&str>,
    limit: usize,
    offset: usize,
    client: &HostelClient,
    format: OutputFormat,
) -> CliResult<()> {
    let students = client.list_students(query, limit, offset).await?;
    match format {
        OutputFormat::Table => {
            output::print_output(students.iter().map(StudentRow::from).collect(), format)
        }
        _ => output::print_single(&students, format),
    }
}

fn report(room: &Room, message: &str, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Table => {
            print_success(message);
            print_room(room);
            Ok(())
        }
        _ => output::print_single(room, format),
    }
}

fn print_room(room: &Room) {
    println!("Room:      {} ({})", room.label, room.id);
    println!("Status:    {}", colorize_status(room.status));
    println!("Beds:      {}/{}", room.occupants.len(), room.capacity);
    for occupant in &room.occupants {
        print!("  - {} ({})", occupant.name, occupant.student_id);
        if let Some(course) = &occupant.course {
            print!(", {}", course);
        }
        println!();
    }
}
