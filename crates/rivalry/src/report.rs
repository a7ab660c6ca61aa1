//! Text reports for a rivalry session

use tier_core::{RankingLedger, Side, Tier, TIER_COUNT};

use crate::session::Session;

impl Session {
    /// Generate a text report: standings, both rosters by tier, recent contests
    pub fn generate_report(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!(
            "=== Rivalry: {} vs {} ===\n\n",
            self.name(Side::A),
            self.name(Side::B)
        ));

        report.push_str("Standings:\n");
        for side in [Side::A, Side::B] {
            match self.rivalry.ledger(side) {
                Some(ledger) => report.push_str(&format!(
                    "  {:<20} {:>8} standing {:>3}\n",
                    self.name(side),
                    ledger.prestige_display(),
                    ledger
                        .standing
                        .map_or_else(|| "-".to_string(), |s| s.to_string())
                )),
                None => report.push_str(&format!("  {:<20} (not started)\n", self.name(side))),
            }
        }
        report.push('\n');

        for side in [Side::A, Side::B] {
            if let Some(ledger) = self.rivalry.ledger(side) {
                report.push_str(&self.roster_report(side, ledger));
                report.push('\n');
            }
        }

        let mut veterans: Vec<_> = self.characters.iter().filter(|c| c.contest_count > 0).collect();
        if !veterans.is_empty() {
            veterans.sort_by(|a, b| b.contest_count.cmp(&a.contest_count));
            report.push_str("Character stats:\n");
            for character in veterans.iter().take(10) {
                report.push_str(&format!(
                    "  {:<20} {:>4} wins / {:>4} contests\n",
                    character.name, character.win_count, character.contest_count
                ));
            }
            report.push('\n');
        }

        if let Some(contest) = self.current_contest() {
            report.push_str(&format!(
                "Next contest: {} vs {}\n\n",
                self.slot_name(Side::A, contest.slot_a_id),
                self.slot_name(Side::B, contest.slot_b_id)
            ));
        }

        report.push_str(&format!("Contests ({} resolved):\n", self.history.len()));
        report.push_str(&format!(
            "{:<20} vs {:<20} {:>6} {:>5} {:>9}\n",
            "Fighter A", "Fighter B", "Result", "Bias", "Standings"
        ));
        report.push_str(&"-".repeat(66));
        report.push('\n');

        for record in self.history.iter().rev().take(10) {
            let Some(contest) = self.contest(record.contest_id) else {
                continue;
            };
            let (a, b) = record.adjustment.after;
            report.push_str(&format!(
                "{:<20} vs {:<20} {:>+6} {:>5} {:>4}/{:<4}\n",
                self.slot_name(Side::A, contest.slot_a_id),
                self.slot_name(Side::B, contest.slot_b_id),
                contest.result().unwrap_or(0),
                contest.bias().map_or(0, i8::from),
                a.unwrap_or(0),
                b.unwrap_or(0)
            ));
        }

        report
    }

    /// Print report to stdout
    pub fn print_report(&self) {
        println!("{}", self.generate_report());
    }

    fn roster_report(&self, side: Side, ledger: &RankingLedger) -> String {
        let mut out = format!("{}'s tiers:\n", self.name(side));
        let mut unplaced = 0;
        let mut rows: Vec<Vec<String>> = vec![Vec::new(); TIER_COUNT];

        for slot in &ledger.slots {
            match ledger.layout.tier_for_position(slot.position) {
                Some(tier) => {
                    let mark = if slot.is_provisional(self.config.provisional_threshold) {
                        "*"
                    } else {
                        ""
                    };
                    rows[tier].push(format!(
                        "{}{} ({}/{})",
                        self.character_name(slot.character_id),
                        mark,
                        slot.win_count,
                        slot.contest_count
                    ));
                }
                None => unplaced += 1,
            }
        }

        for (tier, names) in rows.iter().enumerate() {
            let label = Tier::from_index(tier);
            let marker = if tier == ledger.current_tier() { ">" } else { " " };
            out.push_str(&format!("{} {}: {}\n", marker, label, names.join(", ")));
        }
        if unplaced > 0 {
            out.push_str(&format!("  U: {} not yet placed\n", unplaced));
        }
        out
    }

    fn slot_name(&self, side: Side, slot_id: tier_core::SlotId) -> &str {
        self.rivalry
            .ledger(side)
            .and_then(|ledger| ledger.slot(slot_id))
            .map(|slot| self.character_name(slot.character_id))
            .unwrap_or("?")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tier_core::FixedTieBreak;

    #[test]
    fn test_report_lists_standings_and_contests() {
        let mut session = Session::start("Ana", "Ben", Session::numbered_roster(86), SessionConfig::default());
        let mut rng = StdRng::seed_from_u64(5);
        session.next_contest(&mut rng).unwrap();
        session.resolve_current(-1, Some(1), &mut FixedTieBreak(false)).unwrap();
        session.next_contest(&mut rng).unwrap();

        let report = session.generate_report();

        assert!(report.contains("=== Rivalry: Ana vs Ben ==="));
        assert!(report.contains("Contests (1 resolved)"));
        assert!(report.contains("Next contest:"));
        assert!(report.contains("U: 85 not yet placed"));
        assert!(report.contains("> S:"));
        assert!(!report.contains("Character stats:"));
    }

    #[test]
    fn test_report_lists_character_stats() {
        let mut session = Session::start("Ana", "Ben", Session::numbered_roster(86), SessionConfig::default());
        session.characters[3].contest_count = 12;
        session.characters[3].win_count = 7;
        session.characters[5].contest_count = 2;

        let report = session.generate_report();

        let stats = report.split("Character stats:\n").nth(1).unwrap();
        let lines: Vec<&str> = stats.lines().take_while(|line| !line.is_empty()).collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains(&session.characters[3].name));
        assert!(lines[0].contains("7 wins /   12 contests"));
        assert!(lines[1].contains(&session.characters[5].name));
    }
}
