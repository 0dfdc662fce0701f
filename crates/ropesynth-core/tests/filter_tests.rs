// One-pole and resonant low-pass behaviour, plus the ADSR envelope shapes.

use std::f32::consts::TAU;

use ropesynth_core::{alpha_from_cutoff, CoreError, Envelope, OnePoleLowpass, ResonantLowpass};

const SR: f32 = 44_100.0;

#[test]
fn one_pole_alpha_one_passes_input_through() {
    let mut lp = OnePoleLowpass::new(1.0);
    for x in [0.3, -0.7, 1.0, 0.0, 0.25] {
        assert_eq!(lp.process(x), x);
    }
}

#[test]
fn one_pole_alpha_zero_holds_previous_output() {
    let mut lp = OnePoleLowpass::with_state(0.0, 0.3);
    for x in [1.0, -1.0, 0.5] {
        assert_eq!(lp.process(x), 0.3);
    }
    assert_eq!(lp.output(), 0.3);
    lp.reset();
    assert_eq!(lp.output(), 0.0);
}

#[test]
fn one_pole_converges_to_dc() {
    let mut lp = OnePoleLowpass::new(0.0);
    lp.set_cutoff(500.0, SR);
    let mut y = 0.0;
    for _ in 0..20_000 {
        y = lp.process(1.0);
    }
    assert!((y - 1.0).abs() < 1e-3, "dc settle {y}");
}

#[test]
fn alpha_grows_with_cutoff_and_stays_in_unit_range() {
    let lo = alpha_from_cutoff(100.0, SR);
    let hi = alpha_from_cutoff(4000.0, SR);
    assert!(lo > 0.0 && lo < hi && hi < 1.0, "lo {lo} hi {hi}");
    assert_eq!(alpha_from_cutoff(0.0, SR), 0.0);
    assert_eq!(alpha_from_cutoff(1000.0, 0.0), 0.0);
}

#[test]
fn resonant_lowpass_has_unity_dc_gain() {
    let mut f = ResonantLowpass::new();
    let mut y = 0.0;
    for _ in 0..10_000 {
        y = f.process(1.0, 1000.0, 0.7, SR);
    }
    assert!((y - 1.0).abs() < 1e-3, "dc gain {y}");
}

fn peak_at_cutoff(resonance: f32) -> f32 {
    let cutoff = 1000.0;
    let mut f = ResonantLowpass::new();
    let n = SR as usize;
    let mut peak = 0.0f32;
    for i in 0..n {
        let x = (TAU * cutoff * i as f32 / SR).sin();
        let y = f.process(x, cutoff, resonance, SR);
        if i > n - n / 10 {
            peak = peak.max(y.abs());
        }
    }
    peak
}

#[test]
fn higher_resonance_boosts_the_cutoff_band() {
    let flat = peak_at_cutoff(0.0);
    let peaky = peak_at_cutoff(3.0);
    assert!(
        peaky > flat * 2.0,
        "resonance 3 peak {peaky} vs resonance 0 peak {flat}"
    );
}

#[test]
fn resonant_lowpass_attenuates_far_above_cutoff() {
    let mut f = ResonantLowpass::new();
    let mut peak = 0.0f32;
    for i in 0..8000 {
        let x = (TAU * 15_000.0 * i as f32 / SR).sin();
        let y = f.process(x, 200.0, 0.0, SR);
        if i > 4000 {
            peak = peak.max(y.abs());
        }
    }
    assert!(peak < 0.01, "stopband peak {peak}");
}

#[test]
fn resonant_lowpass_guards_bad_rates_and_cutoffs() {
    let mut f = ResonantLowpass::new();
    assert_eq!(f.process(0.4, 1000.0, 0.5, 0.0), 0.4);
    assert_eq!(f.process(0.4, 1000.0, 0.5, f32::NAN), 0.4);
    for _ in 0..100 {
        let y = f.process(0.5, f32::INFINITY, 0.5, SR);
        assert!(y.is_finite());
        let y = f.process(0.5, -10.0, -1.0, SR);
        assert!(y.is_finite());
    }
}

#[test]
fn pluck_envelope_rises_then_decays_to_silence() {
    let env = Envelope::pluck();
    assert_eq!(env.gain(0.0), 0.0);
    assert!((env.gain(0.05) - 0.5).abs() < 1e-5);
    assert!((env.gain(0.1) - 1.0).abs() < 1e-5);
    assert!(env.gain(0.5) < env.gain(0.2));
    assert!(env.gain(1.0).abs() < 1e-5);
    assert_eq!(env.gain(-1.0), 0.0);
}

#[test]
fn gate_envelope_holds_sustain_then_releases() {
    let env = Envelope::gate();
    assert!((env.gain(0.5) - env.sustain).abs() < 1e-5);
    assert!(env.gain(0.85) < env.sustain);
    assert!(env.gain(1.0).abs() < 1e-5);
    assert_eq!(env.apply(0.8, 0.5), 0.8 * env.sustain);
}

#[test]
fn envelope_validation() {
    assert!(Envelope::new(0.1, 0.2, 0.5, 0.3).is_ok());
    assert!(matches!(
        Envelope::new(0.5, 0.5, 0.5, 0.5),
        Err(CoreError::OutOfUnitRange { .. })
    ));
    assert!(matches!(
        Envelope::new(-0.1, 0.2, 0.5, 0.3),
        Err(CoreError::OutOfUnitRange { value, .. }) if value == -0.1
    ));
}
