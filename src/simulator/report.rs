//! Simulation report generation.

use super::runner::RunStats;
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub num_runs: u32,

    // Aggregated stats
    pub avg_total_kills: f64,
    pub avg_wipes: f64,
    pub avg_gold: f64,
    pub avg_total_xp: f64,
    pub avg_party_level: f64,
    pub avg_skill_ups: f64,
    pub avg_best_weapon_skill: f64,
    pub avg_best_magic_skill: f64,

    // Named spawns
    pub total_named_spawns: u64,
    pub avg_named_gap: Option<f64>,
    pub min_named_gap: Option<u64>,
    pub cooldown_violations: u64,

    // Distribution data
    pub zone_distribution: BTreeMap<u32, u32>,

    // Individual run stats for detailed analysis
    #[serde(skip)]
    pub run_stats: Vec<RunStats>,
}

fn mean(values: impl Iterator<Item = f64>, n: usize) -> f64 {
    values.sum::<f64>() / n.max(1) as f64
}

impl SimReport {
    /// Create a new report from completed run stats.
    pub fn from_runs(runs: Vec<RunStats>) -> Self {
        let n = runs.len();
        let gaps: Vec<u64> = runs.iter().flat_map(|r| r.named_gaps.iter().copied()).collect();

        let mut zone_distribution = BTreeMap::new();
        for run in &runs {
            *zone_distribution.entry(run.final_zone).or_insert(0) += 1;
        }

        Self {
            num_runs: n as u32,
            avg_total_kills: mean(runs.iter().map(|r| r.total_kills as f64), n),
            avg_wipes: mean(runs.iter().map(|r| r.wipes as f64), n),
            avg_gold: mean(runs.iter().map(|r| r.gold as f64), n),
            avg_total_xp: mean(runs.iter().map(|r| r.total_xp as f64), n),
            avg_party_level: mean(
                runs.iter().map(|r| mean(r.party_levels.iter().map(|&l| l as f64), r.party_levels.len())),
                n,
            ),
            avg_skill_ups: mean(runs.iter().map(|r| r.skill_ups as f64), n),
            avg_best_weapon_skill: mean(runs.iter().map(|r| r.best_weapon_skill), n),
            avg_best_magic_skill: mean(runs.iter().map(|r| r.best_magic_skill), n),
            total_named_spawns: runs.iter().map(|r| r.named_spawns).sum(),
            avg_named_gap: (!gaps.is_empty()).then(|| mean(gaps.iter().map(|&g| g as f64), gaps.len())),
            min_named_gap: gaps.iter().min().copied(),
            cooldown_violations: runs.iter().map(|r| r.cooldown_violations).sum(),
            zone_distribution,
            run_stats: runs,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!("Runs: {}\n\n", self.num_runs));

        report.push_str("── PROGRESSION ──────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Total Kills:     {:.0}\n", self.avg_total_kills));
        report.push_str(&format!("  Avg Wipes:           {:.1}\n", self.avg_wipes));
        report.push_str(&format!("  Avg Party Level:     {:.1}\n", self.avg_party_level));
        report.push_str(&format!("  Avg Gold Held:       {:.0}\n", self.avg_gold));
        report.push_str(&format!("  Avg Total XP:        {:.0}\n\n", self.avg_total_xp));

        report.push_str("── SKILLS ───────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Skill-ups:       {:.0}\n", self.avg_skill_ups));
        report.push_str(&format!("  Avg Best Weapon:     {:.1}\n", self.avg_best_weapon_skill));
        report.push_str(&format!("  Avg Best Magic:      {:.1}\n\n", self.avg_best_magic_skill));

        report.push_str("── NAMED SPAWNS ─────────────────────────────────────────────────\n");
        report.push_str(&format!("  Total Spawns:        {}\n", self.total_named_spawns));
        match (self.avg_named_gap, self.min_named_gap) {
            (Some(avg), Some(min)) => {
                report.push_str(&format!("  Avg Gap (kills):     {:.1}\n", avg));
                report.push_str(&format!("  Min Gap (kills):     {}\n", min));
            }
            _ => report.push_str("  Not enough spawns to measure gaps\n"),
        }
        report.push_str(&format!("  Cooldown Violations: {}\n\n", self.cooldown_violations));

        report.push_str("── FINAL ZONE ───────────────────────────────────────────────────\n");
        for (zone, count) in &self.zone_distribution {
            let pct = (*count as f64 / self.num_runs.max(1) as f64) * 100.0;
            let bar: String = "█".repeat((pct / 5.0) as usize);
            report.push_str(&format!("  Zone {:2}: {:>5.1}% {}\n", zone, pct, bar));
        }

        if self.cooldown_violations > 0 {
            report.push_str("\n  ⚠️  Named spawns landed inside their cooldown\n");
        }
        if self.avg_wipes > self.avg_total_kills * 0.2 {
            report.push_str("  ⚠️  Wipe rate very high - damage/HP imbalance?\n");
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");
        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
