//! Risk-factor detection stage.
//!
//! Rules are evaluated in a fixed order and each may append zero or more
//! factors. Factors are never merged or deduplicated, so the same type can
//! appear several times (velocity decline deliberately reuses
//! `inactivity_period`).

use serde_json::json;
use tracing::debug;

use crate::domain::models::activity::ParticipantEngagement;
use crate::domain::models::benchmark::DealBenchmark;
use crate::domain::models::risk::{RiskFactor, RiskFactorType, RiskSeverity};
use crate::domain::models::terms::CategoryWithTerms;
use crate::domain::models::velocity::{VelocityMetrics, VelocityTrend};

const LOW_ENGAGEMENT_RATE: f64 = 40.0;
const CRITICAL_ENGAGEMENT_RATE: f64 = 25.0;

const STUCK_TERM_PROPOSALS: u32 = 3;
const BADLY_STUCK_TERM_PROPOSALS: u32 = 5;

const LEAD_QUIET_DAYS: i64 = 3;
const LEAD_SILENT_DAYS: i64 = 5;

const COVENANT_MIN_CONTESTED_TERMS: usize = 2;
const COVENANT_CONTESTED_PROPOSALS: u32 = 2;
const COVENANT_HISTORICAL_CLOSE_RATE: f64 = 0.40;

const NO_AGREEMENT_DAYS: i64 = 5;
const LOW_RESPONSE_RATE: f64 = 50.0;

fn detect_inactivity(
    metrics: &VelocityMetrics,
    benchmark: &DealBenchmark,
    out: &mut Vec<RiskFactor>,
) {
    let days = metrics.days_since_last_activity;
    let (severity, weight) = if days >= benchmark.inactivity_critical_days {
        (RiskSeverity::High, 0.3)
    } else if days >= benchmark.inactivity_warning_days {
        (RiskSeverity::Medium, 0.15)
    } else {
        return;
    };

    out.push(
        RiskFactor::new(
            RiskFactorType::InactivityPeriod,
            severity,
            weight,
            format!("No negotiation activity for {days} days"),
        )
        .with_data(json!({
            "daysSinceLastActivity": days,
            "warningThreshold": benchmark.inactivity_warning_days,
            "criticalThreshold": benchmark.inactivity_critical_days,
        })),
    );
}

fn detect_low_engagement(
    metrics: &VelocityMetrics,
    participants: &[ParticipantEngagement],
    out: &mut Vec<RiskFactor>,
) {
    let rate = metrics.participant_engagement_rate;
    if rate >= LOW_ENGAGEMENT_RATE {
        return;
    }

    let (severity, weight) = if rate < CRITICAL_ENGAGEMENT_RATE {
        (RiskSeverity::High, 0.25)
    } else {
        (RiskSeverity::Medium, 0.15)
    };
    let inactive = participants.iter().filter(|p| !p.is_active).count();

    out.push(
        RiskFactor::new(
            RiskFactorType::LowEngagement,
            severity,
            weight,
            format!("Only {rate:.0}% of participants active in the last week"),
        )
        .with_data(json!({
            "engagementRate": rate,
            "inactiveParticipants": inactive,
            "totalParticipants": participants.len(),
        })),
    );
}

fn detect_stuck_terms(categories: &[CategoryWithTerms], out: &mut Vec<RiskFactor>) {
    for category in categories {
        for term in category.terms_under_discussion() {
            let pending = term.pending_proposals_count;
            if pending < STUCK_TERM_PROPOSALS {
                continue;
            }
            let (severity, weight) = if pending >= BADLY_STUCK_TERM_PROPOSALS {
                (RiskSeverity::High, 0.2)
            } else {
                (RiskSeverity::Medium, 0.1)
            };
            out.push(
                RiskFactor::new(
                    RiskFactorType::StuckOnTerm,
                    severity,
                    weight,
                    format!(
                        "\"{}\" has {pending} pending proposals without resolution",
                        term.label
                    ),
                )
                .with_term(term.id.clone())
                .with_data(json!({
                    "category": category.name,
                    "pendingProposals": pending,
                    "comments": term.comments_count,
                })),
            );
        }
    }
}

fn detect_unresponsive_leads(participants: &[ParticipantEngagement], out: &mut Vec<RiskFactor>) {
    for lead in participants
        .iter()
        .filter(|p| p.is_deal_lead() && p.days_since_last_activity >= LEAD_QUIET_DAYS)
    {
        let days = lead.days_since_last_activity;
        let severity = if days >= LEAD_SILENT_DAYS {
            RiskSeverity::High
        } else {
            RiskSeverity::Medium
        };
        out.push(
            RiskFactor::new(
                RiskFactorType::UnresponsiveParty,
                severity,
                0.25,
                format!("Deal lead {} has not engaged for {days} days", lead.party_name),
            )
            .with_party(lead.participant_id.clone())
            .with_data(json!({
                "daysSinceLastActivity": days,
                "partyType": lead.party_type,
            })),
        );
    }
}

fn detect_covenant_stalemate(categories: &[CategoryWithTerms], out: &mut Vec<RiskFactor>) {
    for category in categories.iter().filter(|c| c.name_contains("covenant")) {
        let contested: Vec<&str> = category
            .terms_under_discussion()
            .filter(|t| t.pending_proposals_count >= COVENANT_CONTESTED_PROPOSALS)
            .map(|t| t.id.as_str())
            .collect();

        if contested.len() >= COVENANT_MIN_CONTESTED_TERMS {
            out.push(
                RiskFactor::new(
                    RiskFactorType::CovenantStalemate,
                    RiskSeverity::High,
                    0.25,
                    format!(
                        "{} covenant terms contested simultaneously; similar deals closed {:.0}% of the time",
                        contested.len(),
                        COVENANT_HISTORICAL_CLOSE_RATE * 100.0
                    ),
                )
                .with_data(json!({
                    "category": category.name,
                    "contestedTerms": contested,
                    "historicalCloseRate": COVENANT_HISTORICAL_CLOSE_RATE,
                })),
            );
        }
    }
}

fn detect_pricing_deadlock(
    metrics: &VelocityMetrics,
    categories: &[CategoryWithTerms],
    out: &mut Vec<RiskFactor>,
) {
    if metrics.days_since_last_agreement < NO_AGREEMENT_DAYS {
        return;
    }
    for category in categories.iter().filter(|c| c.name_contains("pricing")) {
        let open = category.terms_under_discussion().count();
        if open > 0 {
            out.push(
                RiskFactor::new(
                    RiskFactorType::PricingDeadlock,
                    RiskSeverity::Medium,
                    0.15,
                    format!(
                        "{open} pricing term(s) under discussion with no agreement in {} days",
                        metrics.days_since_last_agreement
                    ),
                )
                .with_data(json!({
                    "category": category.name,
                    "termsUnderDiscussion": open,
                    "daysSinceLastAgreement": metrics.days_since_last_agreement,
                })),
            );
        }
    }
}

fn detect_rejection_streak(metrics: &VelocityMetrics, out: &mut Vec<RiskFactor>) {
    if metrics.response_rate_to_proposals < LOW_RESPONSE_RATE
        && metrics.days_since_last_agreement >= NO_AGREEMENT_DAYS
    {
        out.push(
            RiskFactor::new(
                RiskFactorType::RejectionStreak,
                RiskSeverity::Medium,
                0.15,
                format!(
                    "Only {:.0}% of proposals answered and no agreement in {} days",
                    metrics.response_rate_to_proposals, metrics.days_since_last_agreement
                ),
            )
            .with_data(json!({
                "responseRate": metrics.response_rate_to_proposals,
                "daysSinceLastAgreement": metrics.days_since_last_agreement,
            })),
        );
    }
}

fn detect_velocity_decline(metrics: &VelocityMetrics, out: &mut Vec<RiskFactor>) {
    let (severity, weight, description) = match metrics.velocity_trend {
        VelocityTrend::Stalled => (
            RiskSeverity::High,
            0.2,
            "Negotiation has stalled: no activity this week",
        ),
        VelocityTrend::Decelerating => (RiskSeverity::Medium, 0.1, "Negotiation pace is slowing"),
        VelocityTrend::Accelerating | VelocityTrend::Stable => return,
    };
    out.push(
        RiskFactor::new(RiskFactorType::InactivityPeriod, severity, weight, description)
            .with_data(json!({
                "velocityTrend": metrics.velocity_trend.as_str(),
                "proposalsPerDay": metrics.proposals_per_day,
                "comparedToHistoricalAverage": metrics.compared_to_historical_average,
            })),
    );
}

/// Detect risk factors for a deal.
///
/// Rule order is fixed: inactivity, low engagement, stuck terms, unresponsive
/// deal leads, covenant stalemate, pricing deadlock, rejection streak,
/// velocity decline.
pub fn detect_risk_factors(
    metrics: &VelocityMetrics,
    participants: &[ParticipantEngagement],
    categories: &[CategoryWithTerms],
    benchmark: &DealBenchmark,
) -> Vec<RiskFactor> {
    let mut factors = Vec::new();

    detect_inactivity(metrics, benchmark, &mut factors);
    detect_low_engagement(metrics, participants, &mut factors);
    detect_stuck_terms(categories, &mut factors);
    detect_unresponsive_leads(participants, &mut factors);
    detect_covenant_stalemate(categories, &mut factors);
    detect_pricing_deadlock(metrics, categories, &mut factors);
    detect_rejection_streak(metrics, &mut factors);
    detect_velocity_decline(metrics, &mut factors);

    debug!(
        deal_id = %metrics.deal_id,
        count = factors.len(),
        high = factors.iter().filter(|f| f.severity == RiskSeverity::High).count(),
        "Detected risk factors"
    );

    factors
}
