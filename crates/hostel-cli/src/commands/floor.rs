//! Floor view command
//!
//! The layout comes from the built-in registry on this machine; only the
//! live occupancy is fetched from the daemon. A failed fetch still prints
//! the floor, with every room vacant.

use crate::client::HostelClient;
use crate::error::{CliError, CliResult};
use crate::output::{self, colorize_status, print_warning, OutputFormat};
use colored::*;
use hostel_layout::{reconcile_with_report, FloorStats, LayoutRegistry, Reconciliation};
use hostel_types::{FacilityId, RenderNode, RoomState};
use serde::Serialize;
use tabled::Tabled;

/// Reconciled floor as printed in JSON/YAML mode
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorReport {
    pub facility: FacilityId,
    pub floor: u32,
    pub live: bool,
    pub nodes: Vec<RenderNode>,
    pub stats: FloorStats,
}

/// Table row for one room
#[derive(Debug, Serialize, Tabled)]
pub struct RoomRow {
    #[tabled(rename = "ROOM")]
    pub room: String,
    #[tabled(rename = "LABEL")]
    pub label: String,
    #[tabled(rename = "STATUS")]
    pub status: String,
    #[tabled(rename = "BEDS")]
    pub beds: String,
    #[tabled(rename = "OCCUPANTS")]
    pub occupants: String,
}

impl RoomRow {
    fn from_node(node: &RenderNode) -> Option<Self> {
        let room = node.room.as_ref()?;
        Some(Self {
            room: room.id.to_string(),
            label: room.label.clone(),
            status: colorize_status(room.status).to_string(),
            beds: format!("{}/{}", room.occupants.len(), room.capacity),
            occupants: room
                .occupants
                .iter()
                .map(|o| format!("{} ({})", o.name, o.student_id))
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

/// Find a facility by id, falling back to its short code
pub fn resolve_facility(registry: &LayoutRegistry, hostel: &str) -> CliResult<FacilityId> {
    match registry.facility(hostel) {
        Ok(entry) => Ok(entry.meta.id.clone()),
        Err(not_found) => registry
            .facility_by_code(hostel)
            .map(|entry| entry.meta.id.clone())
            .ok_or_else(|| not_found.into()),
    }
}

/// Reconcile a floor against whatever snapshot is available
pub fn build_report(
    registry: &LayoutRegistry,
    facility: &FacilityId,
    floor: u32,
    snapshot: Option<Vec<RoomState>>,
) -> CliResult<(FloorReport, Reconciliation)> {
    let layout = registry.resolve(facility.as_str(), floor)?;
    let live = snapshot.is_some();
    let reconciliation = reconcile_with_report(layout, &snapshot.unwrap_or_default());
    let report = FloorReport {
        facility: facility.clone(),
        floor,
        live,
        stats: FloorStats::from_render_nodes(&reconciliation.nodes),
        nodes: reconciliation.nodes.clone(),
    };
    Ok((report, reconciliation))
}

/// Keep a fetched snapshot; on any fetch or validation failure warn and fall back to vacant
pub fn live_or_vacant(fetched: CliResult<Vec<RoomState>>) -> Option<Vec<RoomState>> {
    match fetched {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            print_warning(&format!(
                "Could not fetch live occupancy ({}); showing the floor as vacant",
                e
            ));
            None
        }
    }
}

/// Execute the floor command
pub async fn execute(
    hostel: &str,
    floor: u32,
    client: &HostelClient,
    format: OutputFormat,
) -> CliResult<()> {
    let registry = LayoutRegistry::builtin()?;
    let located = resolve_facility(&registry, hostel).and_then(|facility| {
        registry.resolve(facility.as_str(), floor)?;
        Ok(facility)
    });
    let facility = match located {
        Ok(facility) => facility,
        Err(CliError::NotFound(reason)) => {
            print_placeholder(hostel, floor, &reason);
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let snapshot = live_or_vacant(client.floor_snapshot(facility.as_str(), floor).await);

    let (report, reconciliation) = build_report(&registry, &facility, floor, snapshot)?;
    for id in &reconciliation.duplicate_room_ids {
        print_warning(&format!("Room {} reported more than once; using the last entry", id));
    }
    for id in &reconciliation.orphaned_room_ids {
        print_warning(&format!("Room {} is not on the {} floor {} layout", id, facility, floor));
    }

    match format {
        OutputFormat::Table => {
            let rows: Vec<RoomRow> = report.nodes.iter().filter_map(RoomRow::from_node).collect();
            println!("{} floor {}", facility, floor);
            output::print_output(rows, format)?;
            print_stats(&report.stats);
            Ok(())
        }
        _ => output::print_single(&report, format),
    }
}

/// Shown instead of a floor when no layout exists for it
fn print_placeholder(hostel: &str, floor: u32, reason: &str) {
    println!("{}", format!("No layout available for {} floor {}", hostel, floor).dimmed());
    println!("{}", reason.dimmed());
}

fn print_stats(stats: &FloorStats) {
    println!();
    println!(
        "Rooms: {} total, {} occupied, {} vacant, {} reserved",
        stats.total_rooms, stats.occupied, stats.vacant, stats.reserved
    );
    println!(
        "Beds:  {}/{} in use, {} free ({}%)",
        stats.beds_in_use,
        stats.total_beds,
        stats.free_beds(),
        stats.occupancy_rate
    );
}
