//! Plain-text rendering of facility reports.

use amity_core::{
    Admission, BatchReport, Placement, Reallocation, RoomAllocation, RoomView, UnallocatedReport,
};
use std::fmt::Write;

const RULE: &str = "----------------------------------------";

pub fn allocations(rooms: &[RoomAllocation]) -> String {
    if rooms.is_empty() {
        return "no rooms\n".to_string();
    }
    let mut out = String::new();
    for room in rooms {
        let _ = writeln!(out, "{} ({})", room.room.to_uppercase(), room.kind);
        let _ = writeln!(out, "{RULE}");
        if room.occupants.is_empty() {
            out.push_str("(empty)\n");
        } else {
            let _ = writeln!(out, "{}", room.occupants.join(", "));
        }
        out.push('\n');
    }
    out
}

pub fn unallocated(report: &UnallocatedReport) -> String {
    if report.is_empty() {
        return "everyone is allocated\n".to_string();
    }
    let mut out = String::new();
    section(&mut out, "WITHOUT OFFICE", &report.people_without_office);
    section(
        &mut out,
        "FELLOWS WITHOUT LIVING SPACE",
        &report.fellows_without_living_space,
    );
    out
}

pub fn room(view: &RoomView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}) {}/{} occupied",
        view.name.to_uppercase(),
        view.kind,
        view.capacity - view.available,
        view.capacity
    );
    let _ = writeln!(out, "{RULE}");
    for name in &view.occupants {
        let _ = writeln!(out, "{name}");
    }
    out
}

pub fn admission(admission: &Admission) -> String {
    let mut out = format!("added {} {}\n", admission.role, admission.name);
    for placement in &admission.placements {
        let _ = writeln!(out, "  {} -> {}", placement.kind, placement.room);
    }
    for kind in &admission.unplaced {
        let _ = writeln!(out, "  {kind}: no room available");
    }
    out
}

pub fn batch(report: &BatchReport) -> String {
    let mut out = String::new();
    for added in &report.added {
        out.push_str(&admission(added));
    }
    for skipped in &report.skipped {
        let _ = writeln!(out, "line {}: {} already exists, skipped", skipped.line, skipped.name);
    }
    let _ = writeln!(
        out,
        "{} added, {} skipped",
        report.added.len(),
        report.skipped.len()
    );
    out
}

pub fn reallocation(moved: &Reallocation) -> String {
    match &moved.from {
        Some(from) => format!("moved {} from {} to {}\n", moved.person, from, moved.to),
        None => format!("moved {} into {}\n", moved.person, moved.to),
    }
}

pub fn placements(placements: &[Placement]) -> String {
    if placements.is_empty() {
        return "nothing to allocate\n".to_string();
    }
    let mut out = String::new();
    for placement in placements {
        let _ = writeln!(
            out,
            "{} -> {} ({})",
            placement.person, placement.room, placement.kind
        );
    }
    out
}

fn section(out: &mut String, title: &str, names: &[String]) {
    if names.is_empty() {
        return;
    }
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{RULE}");
    for name in names {
        let _ = writeln!(out, "{name}");
    }
    out.push('\n');
}
