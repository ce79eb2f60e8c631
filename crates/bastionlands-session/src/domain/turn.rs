//! Deterministic turn handlers, one per intent.
//!
//! Handlers mutate the session and describe what happened in plain terms.
//! They never call the model; narration happens afterwards.

use bastionlands_core::determinism::DeterministicRng;
use bastionlands_narrative::domain::intent::Intent;
use bastionlands_narrative::domain::interpretation::Interpretation;
use bastionlands_rules::domain::action::{Action, ActionResult, RollRecord, Risk, resolve_action};
use bastionlands_rules::domain::combat::{
    CombatOutcome, EnemyKind, ExchangeReport, resolve_exchange, start_combat,
};
use bastionlands_world::domain::hex::Direction;
use bastionlands_world::domain::map::{ExploreReport, explore};
use bastionlands_world::domain::myth::OMENS_PER_MYTH;
use bastionlands_world::domain::travel::{MOVES_PER_DAY, TravelRefusal, TravelReport, travel};
use serde::Serialize;
use tracing::debug;

use super::context::status_report;
use super::game_session::GameSession;

/// The mechanical result of a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnEvent {
    Explored(ExploreReport),
    Travelled(TravelReport),
    TravelRefused(TravelRefusal),
    Rested { day: u32 },
    CombatStarted { enemy: EnemyKind, foes: Vec<String> },
    Exchange(ExchangeReport),
    Status,
    Action { actor: String, result: ActionResult },
    /// The intent cannot be carried out while foes are fighting.
    Blocked { intent: String },
    /// Nobody is left to act.
    NoKnight,
}

/// A resolved turn, ready for narration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub event: TurnEvent,
    /// Plain description of the result, used as the narration brief.
    pub summary: String,
    /// Whether the model should narrate this turn.
    pub narrate: bool,
    pub options: Vec<String>,
}

fn options(list: &[&str]) -> Vec<String> {
    list.iter().map(|option| (*option).to_owned()).collect()
}

fn outcome(event: TurnEvent, summary: String, suggested: &[&str]) -> TurnOutcome {
    TurnOutcome {
        event,
        summary,
        narrate: true,
        options: options(suggested),
    }
}

/// Runs the handler for the interpreted intent.
pub fn apply_turn(
    session: &mut GameSession,
    interpretation: &Interpretation,
    player_input: &str,
    rng: &mut dyn DeterministicRng,
) -> TurnOutcome {
    let intent = &interpretation.intent;

    if session.active_combat.is_some()
        && matches!(intent, Intent::Explore | Intent::Travel | Intent::Rest)
    {
        return outcome(
            TurnEvent::Blocked {
                intent: intent.label().to_owned(),
            },
            format!(
                "Foes press the attack; there is no time to {} now.",
                intent.label()
            ),
            &["Press the attack", "Check the company"],
        );
    }

    let result = match intent {
        Intent::Explore => handle_explore(session, rng),
        Intent::Travel => handle_travel(session, player_input, rng),
        Intent::Rest => handle_rest(session),
        Intent::Combat => handle_combat(session, player_input, rng),
        Intent::Status => TurnOutcome {
            event: TurnEvent::Status,
            summary: status_report(session),
            narrate: false,
            options: options(&["Explore this hex", "Travel onward", "Make camp"]),
        },
        Intent::Unrecognized(label) => {
            handle_action(session, interpretation, label, player_input, rng)
        }
    };

    debug!(intent = %intent, summary = %result.summary, "applied turn");
    result
}

fn handle_explore(session: &mut GameSession, rng: &mut dyn DeterministicRng) -> TurnOutcome {
    let report = explore(
        &mut session.world,
        session.position,
        session.company.size(),
        rng,
    );
    let terrain = session
        .world
        .get(report.coord)
        .map_or_else(|| "the wilds".to_owned(), |hex| hex.terrain.to_string());

    let mut summary = format!(
        "The company searches the {terrain} at {} (rolled {} + {}).",
        report.coord, report.roll, report.bonus
    );
    if report.success {
        match &report.landmark {
            Some(landmark) => summary.push_str(&format!(" They find {landmark}.")),
            None => summary.push_str(" They find nothing of note."),
        }
        if let Some(omen) = &report.omen {
            summary.push_str(&format!(
                " An omen of {} ({}/{OMENS_PER_MYTH}): {}.",
                omen.myth_name, omen.index, omen.text
            ));
        }
    } else {
        summary.push_str(" The search turns up nothing.");
    }
    if report.revealed > 0 {
        summary.push_str(&format!(" {} new hexes come into view.", report.revealed));
    }

    outcome(
        TurnEvent::Explored(report),
        summary,
        &["Search the hex again", "Travel onward", "Make camp"],
    )
}

fn handle_travel(
    session: &mut GameSession,
    player_input: &str,
    rng: &mut dyn DeterministicRng,
) -> TurnOutcome {
    let direction = Direction::parse(player_input);
    match travel(
        &mut session.world,
        session.position,
        direction,
        session.moves_remaining,
        rng,
    ) {
        Ok(report) => {
            session.position = report.to;
            session.moves_remaining = report.moves_remaining;

            let mut summary = format!(
                "The company travels {} into the {} at {}, spending {} moves ({} left today).",
                report.direction, report.terrain, report.to, report.cost, report.moves_remaining
            );
            if let Some(landmark) = &report.landmark {
                summary.push_str(&format!(" {landmark} rises nearby."));
            }
            outcome(
                TurnEvent::Travelled(report),
                summary,
                &["Explore this hex", "Continue travelling", "Make camp"],
            )
        }
        Err(refusal) => {
            let summary = match &refusal {
                TravelRefusal::Barrier { coord } => {
                    format!("The way {direction} to {coord} is impassable.")
                }
                TravelRefusal::Exhausted { needed, remaining } => format!(
                    "The day is too far spent: going {direction} needs {needed} moves but only {remaining} remain."
                ),
            };
            outcome(
                TurnEvent::TravelRefused(refusal),
                summary,
                &["Travel another way", "Make camp", "Explore this hex"],
            )
        }
    }
}

fn handle_rest(session: &mut GameSession) -> TurnOutcome {
    for member in session
        .company
        .members
        .iter_mut()
        .filter(|member| member.is_alive())
    {
        member.restore_guard();
    }
    session.moves_remaining = MOVES_PER_DAY;
    session.day += 1;

    outcome(
        TurnEvent::Rested { day: session.day },
        format!(
            "The company makes camp. Guard is restored and day {} dawns.",
            session.day
        ),
        &["Explore this hex", "Travel north", "Check the company"],
    )
}

fn handle_combat(
    session: &mut GameSession,
    player_input: &str,
    rng: &mut dyn DeterministicRng,
) -> TurnOutcome {
    let Some(state) = session.active_combat.as_mut() else {
        let kind = EnemyKind::from_text(player_input);
        let state = start_combat(kind, &session.company.members);
        let foes: Vec<String> = state.foes.iter().map(|foe| foe.name.clone()).collect();
        let summary = format!(
            "Combat begins! {} {kind} attack: {}.",
            foes.len(),
            foes.join(", ")
        );
        session.active_combat = Some(state);
        return outcome(
            TurnEvent::CombatStarted { enemy: kind, foes },
            summary,
            &["Press the attack", "Check the company"],
        );
    };

    let report = resolve_exchange(state, &mut session.company.members, rng);
    let mut summary = format!("Round {}: {}.", report.round, report.events.join("; "));
    let suggested: &[&str] = match report.outcome {
        CombatOutcome::Ongoing => &["Press the attack", "Check the company"],
        CombatOutcome::Victory => {
            summary.push_str(" The foes are vanquished.");
            &["Tend wounds and rest", "Explore this hex", "Travel onward"]
        }
        CombatOutcome::Defeat => {
            summary.push_str(" The company has fallen.");
            &["Check the company"]
        }
    };
    if report.outcome != CombatOutcome::Ongoing {
        session.active_combat = None;
    }

    outcome(TurnEvent::Exchange(report), summary, suggested)
}

fn describe_roll(roll: &RollRecord) -> String {
    match roll {
        RollRecord::Save(save) => format!(
            "{} save rolled {} against {}",
            save.virtue, save.roll, save.target
        ),
        RollRecord::Luck(luck) => format!("luck roll {}: {}", luck.roll, luck.outcome),
    }
}

fn handle_action(
    session: &mut GameSession,
    interpretation: &Interpretation,
    label: &str,
    player_input: &str,
    rng: &mut dyn DeterministicRng,
) -> TurnOutcome {
    let suggested = &["Explore this hex", "Travel onward", "Check the company"];
    let Some(lead) = session.company.lead_knight_mut() else {
        return outcome(
            TurnEvent::NoKnight,
            "No knight remains standing to act.".to_owned(),
            &["Check the company"],
        );
    };

    let action = Action {
        intent: if label.trim().is_empty() {
            player_input.trim().to_owned()
        } else {
            label.to_owned()
        },
        leverage: interpretation.leverage.clone(),
        cost: interpretation.cost.clone(),
        risk: Risk::from_label(&interpretation.risk),
    };
    let result = resolve_action(&action, lead, rng);

    let mut summary = format!(
        "{} attempts to {}: {}",
        lead.name,
        action.intent,
        if result.success { "success" } else { "failure" }
    );
    if let Some(roll) = &result.roll {
        summary.push_str(&format!(" ({})", describe_roll(roll)));
    }
    summary.push_str(&format!(", the situation will {}.", result.outcome));
    if let Some((virtue, amount)) = result.virtue_loss {
        summary.push_str(&format!(" The effort costs {amount} {virtue}."));
    }

    let actor = lead.name.clone();
    outcome(TurnEvent::Action { actor, result }, summary, suggested)
}
