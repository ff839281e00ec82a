//! End-to-end engine scenarios on a simulated clock.
//!
//! Every test seeds the RNG and drives time through `advance_to`, so runs
//! are reproducible and never sleep.

use dyslexia_sim::text::CellMeasurer;
use dyslexia_sim::unicode::display_width;
use dyslexia_sim::{EngineConfig, Rule, Rules, Simulator, SubstitutionDictionary};
use std::io::Write;
use std::time::Duration;

const TEXT: &str = "La dislessia è un disturbo specifico che influisce sulla capacità \
di leggere con precisione e fluidità. Le persone possono presentare difficoltà \
nel riconoscere le parole, e la lettura diventa un processo lento.";

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn simulator(seed: u64) -> Simulator {
    Simulator::new(EngineConfig::default())
        .expect("default config is valid")
        .with_seed(seed)
}

/// Step the clock in 16ms frames, checking reserved widths on every frame.
fn run_frames(sim: &mut Simulator, until: Duration) {
    while sim.now() < until {
        let next = (sim.now() + ms(16)).min(until);
        sim.advance_to(next);
        assert_widths_hold(sim);
    }
}

fn assert_widths_hold(sim: &Simulator) {
    let registry = sim.registry();
    for (index, token) in registry.words() {
        let shown = registry.displayed_text(index).expect("word has a display");
        assert!(
            display_width(&shown) as u32 <= token.display_width(),
            "{shown:?} overflows the width reserved for {:?}",
            token.text()
        );
    }
}

#[test]
fn all_rules_restore_the_original_when_disabled() {
    let mut sim = simulator(11);
    sim.set_text(TEXT);
    sim.set_rules(Rules::all());
    run_frames(&mut sim, ms(20_000));

    sim.set_rules(Rules::empty());
    assert_eq!(sim.registry().displayed_document(), TEXT);
    assert!(sim.registry().all_restored());
    assert_eq!(sim.pending_timers(), 0);
    for rule in Rule::ALL {
        assert!(!sim.is_rule_active(rule));
        assert_eq!(sim.outstanding(rule), 0);
    }
}

#[test]
fn distortions_show_up_and_fade_away() {
    let mut sim = simulator(5);
    sim.set_text(TEXT);
    sim.set_rule(Rule::LetterSwap, true);

    let mut distorted_frames = 0;
    while sim.now() < ms(30_000) {
        sim.advance_by(ms(50));
        if sim.registry().displayed_document() != TEXT {
            distorted_frames += 1;
        }
    }
    assert!(distorted_frames > 0);
    assert!(sim.is_rule_active(Rule::LetterSwap));

    sim.set_rule(Rule::LetterSwap, false);
    assert_eq!(sim.registry().displayed_document(), TEXT);
}

#[test]
fn rule_toggles_are_independent() {
    let mut sim = simulator(3);
    sim.set_text(TEXT);
    sim.set_rules(Rules::BLUR_PULSE | Rules::WORD_SWAP);
    run_frames(&mut sim, ms(6_000));

    sim.set_rule(Rule::WordSwap, false);
    assert!(sim.is_rule_active(Rule::BlurPulse));
    assert!(!sim.is_rule_active(Rule::WordSwap));
    assert_eq!(sim.outstanding(Rule::WordSwap), 0);
    run_frames(&mut sim, ms(12_000));
    assert!(sim.is_rule_active(Rule::BlurPulse));
}

#[test]
fn reset_waits_for_the_settle_delay() {
    let mut sim = simulator(8);
    sim.set_text(TEXT);
    sim.set_rules(Rules::all());
    run_frames(&mut sim, ms(5_000));

    sim.reset();
    assert!(sim.is_settling());
    assert_eq!(sim.registry().displayed_document(), TEXT);
    assert_eq!(sim.pending_timers(), 1);
    for rule in Rule::ALL {
        assert!(!sim.is_rule_active(rule));
    }

    sim.advance_to(ms(5_099));
    assert!(sim.is_settling());
    sim.advance_to(ms(5_100));
    assert!(!sim.is_settling());
    for rule in Rule::ALL {
        assert!(sim.is_rule_active(rule));
    }
}

#[test]
fn new_text_restarts_flagged_rules_on_the_new_tokens() {
    let mut sim = simulator(21);
    sim.set_text(TEXT);
    sim.set_rules(Rules::LETTER_SWAP | Rules::WORD_SWAP);
    run_frames(&mut sim, ms(4_000));

    sim.set_text("Meglio tardi che mai");
    assert_eq!(sim.input(), "Meglio tardi che mai");
    assert_eq!(sim.registry().len(), 7);
    assert!(sim.is_rule_active(Rule::LetterSwap));
    assert!(sim.is_rule_active(Rule::WordSwap));
    assert!(!sim.is_rule_active(Rule::BlurPulse));
    run_frames(&mut sim, ms(10_000));
}

#[test]
fn blank_text_schedules_nothing() {
    let mut sim = simulator(1);
    sim.set_rules(Rules::all());
    sim.set_text(" \n\t ");
    assert!(sim.registry().is_empty());
    assert_eq!(sim.pending_timers(), 0);

    sim.reset();
    assert!(!sim.is_settling());
    sim.advance_to(ms(10_000));
    assert_eq!(sim.pending_timers(), 0);
}

#[test]
fn same_seed_same_frames() {
    let frames = |seed| {
        let mut sim = simulator(seed);
        sim.set_text(TEXT);
        sim.set_rules(Rules::all());
        (1..=40)
            .map(|i| {
                sim.advance_to(ms(i * 250));
                sim.registry().displayed_document()
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(frames(99), frames(99));
}

#[test]
fn dictionary_file_drives_word_swap() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "# test table").expect("write");
    writeln!(file, "gatto: gatta").expect("write");

    let dictionary = SubstitutionDictionary::from_path(file.path()).expect("valid dictionary");
    let mut config = EngineConfig::default();
    config.word_swap.probability = 1.0;
    let mut sim = Simulator::new(config)
        .expect("valid config")
        .with_dictionary(dictionary)
        .with_measurer(Box::new(CellMeasurer::default()))
        .with_seed(4);
    sim.set_text("Il Gatto dorme");
    sim.set_rule(Rule::WordSwap, true);

    assert_eq!(sim.registry().displayed_document(), "Il Gatta dorme");
    // restores are due no earlier than 4s
    sim.advance_to(ms(3_999));
    assert_eq!(sim.registry().displayed_text(2).as_deref(), Some("Gatta"));
}

#[test]
fn malformed_dictionary_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "gatto gatta").expect("write");

    let err = SubstitutionDictionary::from_path(file.path()).unwrap_err();
    assert!(matches!(err, dyslexia_sim::Error::Dictionary { line: 1, .. }));
}
