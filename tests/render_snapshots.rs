//! Snapshot tests for the markup and terminal renderings.
//!
//! Every distortion here is forced (probability 1, one candidate) so the
//! output does not depend on the RNG stream.

use dyslexia_sim::render::{TextSurface, to_markup};
use dyslexia_sim::{
    AnsiWriter, ColorMode, EngineConfig, Rule, Simulator, SubstitutionDictionary,
};
use std::time::Duration;

fn forced_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.letter_swap.probability = 1.0;
    config.blur_pulse.probability = 1.0;
    config.word_swap.probability = 1.0;
    config
}

fn simulator(dictionary: &str) -> Simulator {
    Simulator::new(forced_config())
        .expect("valid config")
        .with_dictionary(SubstitutionDictionary::parse(dictionary).expect("valid dictionary"))
        .with_seed(0)
}

#[test]
fn idle_markup() {
    let mut sim = simulator("lettura: lettera");
    sim.set_text("La <lettura> & \"altro\"");
    insta::assert_snapshot!(to_markup(&sim.render_units()), @r#"<span class="word" data-original="La" data-index="0" style="min-width: 2ch; width: 2ch;">La</span> <span class="word" data-original="&lt;lettura&gt;" data-index="2" style="min-width: 9ch; width: 9ch;">&lt;lettura&gt;</span> <span class="word" data-original="&amp;" data-index="4" style="min-width: 1ch; width: 1ch;">&amp;</span> <span class="word" data-original="&quot;altro&quot;" data-index="6" style="min-width: 7ch; width: 7ch;">&quot;altro&quot;</span>"#);
}

#[test]
fn swapped_word_markup() {
    let mut sim = simulator("lettura: lettera");
    sim.set_text("La lettura");
    sim.set_rule(Rule::WordSwap, true);
    insta::assert_snapshot!(to_markup(&sim.render_units()), @r#"<span class="word" data-original="La" data-index="0" style="min-width: 2ch; width: 2ch;">La</span> <span class="word" data-original="lettura" data-index="2" style="min-width: 7ch; width: 7ch; text-align: left; overflow: hidden;">lettera</span>"#);
}

#[test]
fn letter_swap_on_the_terminal_surface() {
    let mut sim = simulator("");
    sim.set_text("Aspetta la sera");
    sim.set_rule(Rule::LetterSwap, true);
    let text = TextSurface::new(10).plain_text(&sim.render_units());
    insta::assert_snapshot!(text, @r"
    Espatte le
    sare
    ");
}

#[test]
fn blur_peak_markup() {
    let mut sim = simulator("");
    sim.set_text("difficile");
    sim.set_rule(Rule::BlurPulse, true);
    // halfway through the period is the blur peak
    sim.advance_to(Duration::from_millis(2000));
    insta::assert_snapshot!(to_markup(&sim.render_units()), @r#"<span class="word" data-original="difficile" data-index="0" style="min-width: 9ch; width: 9ch;">di<span style="filter: blur(1px); opacity: 0.6;">f</span><span style="filter: blur(2px); opacity: 0.6;">f</span><span style="filter: blur(3px); opacity: 0.6;">i</span><span style="filter: blur(2px); opacity: 0.6;">c</span><span style="filter: blur(1px); opacity: 0.6;">i</span>le</span>"#);
}

#[test]
fn ansi_frame_without_color() {
    let mut sim = simulator("");
    sim.set_text("ciao");
    let frame = TextSurface::new(6).render(&sim.render_units());
    let mut writer = AnsiWriter::with_color_mode(Vec::new(), ColorMode::NoColor);
    writer.write_frame(&frame);
    writer.flush().expect("flush to vec");
    let out = String::from_utf8(writer.into_inner()).expect("utf-8");
    insta::assert_snapshot!(out.escape_debug().to_string(), @r"\u{1b}[?2026h\u{1b}[H\u{1b}[1;1Hciao  \u{1b}[0m\u{1b}[?2026l");
}
