//! Plain-text summaries of a session, for the player and for the model.

use std::fmt::Write;

use bastionlands_world::domain::travel::MOVES_PER_DAY;

use super::game_session::GameSession;

/// Recent turns included in the model context.
const CONTEXT_TURNS: usize = 3;

/// The company, each member's condition and where they stand.
#[must_use]
pub fn status_report(session: &GameSession) -> String {
    let mut report = format!(
        "Company: {} (day {}, turn {})\n",
        session.company.name, session.day, session.turn_count
    );

    for member in &session.company.members {
        let _ = writeln!(
            report,
            "- {} ({}): VIG {}/{} CLA {} SPI {} GD {}/{} [{}]",
            member.name,
            member.role,
            member.virtues.vigour,
            member.max_virtues.vigour,
            member.virtues.clarity,
            member.virtues.spirit,
            member.guard,
            member.max_guard,
            member.status()
        );
    }

    match session.current_hex() {
        Some(hex) => {
            let _ = write!(report, "Location: {} at {}", hex.terrain, hex.coord);
            if hex.river {
                report.push_str(", by a river");
            }
            if hex.explored {
                if let Some(landmark) = &hex.landmark {
                    let _ = write!(report, ", near {landmark}");
                }
            }
        }
        None => {
            let _ = write!(report, "Location: uncharted land at {}", session.position);
        }
    }
    let _ = write!(
        report,
        ". {}/{MOVES_PER_DAY} moves left today.",
        session.moves_remaining
    );

    report
}

/// Everything the model needs to interpret or narrate a turn.
#[must_use]
pub fn summarize(session: &GameSession) -> String {
    let mut context = status_report(session);

    if let Some((_, distance)) = session.world.nearest_myth(session.position) {
        let _ = write!(context, "\nA myth stirs {distance} hexes away.");
    }

    if let Some(combat) = &session.active_combat {
        let foes: Vec<String> = combat
            .living_foes()
            .map(|foe| format!("{} (VIG {}, GD {})", foe.name, foe.vigour, foe.guard))
            .collect();
        let _ = write!(
            context,
            "\nIn combat with {}, round {}: {}",
            combat.enemy,
            combat.round,
            foes.join(", ")
        );
    }

    let recent = session.history.len().saturating_sub(CONTEXT_TURNS);
    if recent < session.history.len() {
        context.push_str("\nRecent actions:");
        for entry in &session.history[recent..] {
            let _ = write!(
                context,
                "\n- Turn {}: {} => {}",
                entry.turn, entry.input, entry.summary
            );
        }
    }

    context
}
