//! Slots command for printing the hour gutter.

use std::io::Write;

use anyhow::{Context, Result};
use tg_core::generate_slots;

pub fn run<W: Write>(writer: &mut W, step: u32, ampm: bool) -> Result<()> {
    let slots = generate_slots(step).context("invalid slot step")?;
    for slot in slots {
        writeln!(writer, "{}", slot.label(ampm))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    fn render(step: u32, ampm: bool) -> String {
        let mut output = Vec::new();
        run(&mut output, step, ampm).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn slots_command_prints_24h_labels() {
        assert_snapshot!(render(360, false), @r"
        0:00
        6:00
        12:00
        18:00
        ");
    }

    #[test]
    fn slots_command_prints_12h_labels() {
        assert_snapshot!(render(450, true), @r"
        12 AM
        7:30 AM
        3 PM
        10:30 PM
        ");
    }

    #[test]
    fn slots_command_rejects_zero_step() {
        let mut output = Vec::new();
        let err = run(&mut output, 0, false).unwrap_err();
        assert_eq!(format!("{err:#}"), "invalid slot step: slot step must be at least one minute, got 0");
        assert!(output.is_empty());
    }
}
