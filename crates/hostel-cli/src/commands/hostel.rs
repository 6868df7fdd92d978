//! Daemon status and facility catalog commands

use crate::client::{FloorInfo, HostelClient, HostelInfo};
use crate::error::CliResult;
use crate::output::{self, print_error, print_success, OutputFormat};
use serde::Serialize;
use tabled::Tabled;

/// Table row for a facility
#[derive(Debug, Serialize, Tabled)]
pub struct HostelRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "CODE")]
    pub code: String,
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "TYPE")]
    pub kind: String,
    #[tabled(rename = "FLOORS")]
    pub floors: usize,
}

impl From<HostelInfo> for HostelRow {
    fn from(info: HostelInfo) -> Self {
        Self {
            id: info.id.to_string(),
            code: info.code,
            name: info.name,
            kind: format!("{:?}", info.kind).to_lowercase(),
            floors: info.floor_count,
        }
    }
}

/// Table row for a floor
#[derive(Debug, Serialize, Tabled)]
pub struct FloorRow {
    #[tabled(rename = "FLOOR")]
    pub floor: u32,
    #[tabled(rename = "ROOMS")]
    pub rooms: usize,
}

impl From<FloorInfo> for FloorRow {
    fn from(info: FloorInfo) -> Self {
        Self {
            floor: info.floor_number,
            rooms: info.room_count,
        }
    }
}

/// Print daemon health and counters. Returns false when the daemon is unreachable.
pub async fn status(client: &HostelClient, format: OutputFormat) -> CliResult<bool> {
    let status = match client.status().await {
        Ok(status) => status,
        Err(e) => {
            print_error(&format!("Cannot connect to hostel daemon: {}", e));
            return Ok(false);
        }
    };

    match format {
        OutputFormat::Table => {
            print_success("Hostel daemon is healthy");
            println!("  Version:     {}", status.version);
            println!("  Uptime:      {}", status.uptime);
            println!("  Facilities:  {}", status.stats.facilities);
            println!("  Floors:      {}", status.stats.floors);
            println!(
                "  Rooms:       {} tracked, {} occupied, {} reserved",
                status.stats.rooms_tracked, status.stats.occupied_rooms, status.stats.reserved_rooms
            );
            println!("  Occupants:   {}", status.stats.occupants);
            println!("  Subscribers: {}", status.stats.event_subscribers);
        }
        _ => output::print_single(&status, format)?,
    }
    Ok(true)
}

pub async fn list_hostels(client: &HostelClient, format: OutputFormat) -> CliResult<()> {
    let hostels = client.list_hostels().await?;
    match format {
        OutputFormat::Table => {
            output::print_output(hostels.into_iter().map(HostelRow::from).collect(), format)
        }
        _ => output::print_single(&hostels, format),
    }
}

pub async fn list_floors(hostel: &str, client: &HostelClient, format: OutputFormat) -> CliResult<()> {
    let floors = client.list_floors(hostel).await?;
    match format {
        OutputFormat::Table => {
            output::print_output(floors.into_iter().map(FloorRow::from).collect(), format)
        }
        _ => output::print_single(&floors, format),
    }
}
