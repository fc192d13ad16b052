//! Line-oriented prompting for the operator form.
//!
//! Generic over reader and writer so the whole dialogue can be driven from
//! tests with in-memory buffers.

use std::io::{BufRead, Write};

use crate::core::errors::{Result, TenureError};
use crate::features::{FeatureRecord, RawValue};

use super::{Control, FORM_FIELDS, FieldSpec, Section};

/// Interpret one answer for a field. Empty input selects the field default.
///
/// Returns a short reason on rejection; the caller re-prompts.
pub fn parse_answer(spec: &FieldSpec, answer: &str) -> std::result::Result<RawValue, String> {
    parse_answer_or(spec, &spec.default_value(), answer)
}

/// Like [`parse_answer`], with `default` taken on empty input.
pub fn parse_answer_or(
    spec: &FieldSpec,
    default: &RawValue,
    answer: &str,
) -> std::result::Result<RawValue, String> {
    let answer = answer.trim();
    if answer.is_empty() {
        return Ok(default.clone());
    }
    match spec.control {
        Control::Select => {
            let options = spec.options();
            if let Ok(number) = answer.parse::<usize>() {
                return number
                    .checked_sub(1)
                    .and_then(|index| options.get(index))
                    .map(|option| RawValue::Category((*option).to_string()))
                    .ok_or_else(|| format!("choose 1-{}", options.len()));
            }
            options
                .iter()
                .find(|option| option.eq_ignore_ascii_case(answer))
                .map(|option| RawValue::Category((*option).to_string()))
                .ok_or_else(|| format!("'{answer}' is not one of: {}", options.join(", ")))
        }
        Control::Number { min, max, .. } | Control::Slider { min, max, .. } => {
            let value = answer
                .parse::<i64>()
                .map_err(|_| format!("'{answer}' is not a whole number"))?;
            if value < min || value > max {
                return Err(format!("{value} is outside {min}..={max}"));
            }
            Ok(RawValue::Int(value))
        }
    }
}

/// One pass through the form on a reader/writer pair.
pub struct FormSession<R, W> {
    input: R,
    output: W,
    defaults: FeatureRecord,
}

impl<R: BufRead, W: Write> FormSession<R, W> {
    /// Session reading answers from `input` and writing prompts to `output`.
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            defaults: super::default_record(),
        }
    }

    /// Offer `previous` answers as the defaults, e.g. when resubmitting.
    #[must_use]
    pub fn with_defaults(mut self, previous: &FeatureRecord) -> Self {
        for (feature, value) in previous.iter() {
            self.defaults.set(feature, value.clone());
        }
        self
    }

    /// Ask every field in order and return the completed record.
    pub fn collect(&mut self) -> Result<FeatureRecord> {
        let mut record = FeatureRecord::new();
        let mut section: Option<Section> = None;
        for spec in &FORM_FIELDS {
            if section != Some(spec.section) {
                section = Some(spec.section);
                self.write(&format!("\n== {} ==\n", spec.section.title()))?;
            }
            let value = self.ask(spec)?;
            record.set(spec.feature, value);
        }
        Ok(record)
    }

    /// Yes/no question; anything but `y`/`yes` (including closed input) is no.
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        self.write(&format!("{question} [y/N]: "))?;
        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .map_err(|err| TenureError::io("<stdin>", err))?;
        let answer = line.trim();
        Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
    }

    fn ask(&mut self, spec: &FieldSpec) -> Result<RawValue> {
        let default = self
            .defaults
            .get(spec.feature)
            .cloned()
            .unwrap_or_else(|| spec.default_value());
        if matches!(spec.control, Control::Select) {
            let mut listing = String::new();
            for (index, option) in spec.options().iter().enumerate() {
                listing.push_str(&format!("    {}) {option}\n", index + 1));
            }
            self.write(&listing)?;
        }
        loop {
            self.write(&prompt_line(spec, &default))?;
            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .map_err(|err| TenureError::io("<stdin>", err))?;
            if read == 0 {
                return Err(TenureError::FormAborted {
                    field: spec.feature.column(),
                });
            }
            match parse_answer_or(spec, &default, &line) {
                Ok(value) => return Ok(value),
                Err(reason) => self.write(&format!("  ! {reason}\n"))?,
            }
        }
    }

    fn write(&mut self, text: &str) -> Result<()> {
        self.output
            .write_all(text.as_bytes())
            .and_then(|()| self.output.flush())
            .map_err(|err| TenureError::io("<stdout>", err))
    }
}

fn prompt_line(spec: &FieldSpec, default: &RawValue) -> String {
    match spec.control {
        Control::Number { min, max, step, .. } if step > 1 => {
            format!("{} [{min}-{max}, step {step}] ({default}): ", spec.label)
        }
        Control::Number { min, max, .. } | Control::Slider { min, max, .. } => {
            format!("{} [{min}-{max}] ({default}): ", spec.label)
        }
        Control::Select => format!("{} ({default}): ", spec.label),
    }
}
