use std::fmt::Write;

use ml_core::Features;

use crate::metadata;

/// What the form page shows below the inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Empty,
    Prediction { features: Features, price: f64 },
    Error(String),
}

/// Field values echoed back into the form after a submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues {
    pub size: String,
    pub bedrooms: String,
    pub age: String,
}

const STYLE: &str = "\
body { font-family: sans-serif; max-width: 40rem; margin: 2rem auto; color: #222; }
label { display: block; margin-top: 0.75rem; }
input { width: 100%; padding: 0.4rem; }
button { margin-top: 1rem; padding: 0.5rem 1.5rem; }
.result { margin-top: 1.5rem; padding: 1rem; background: #e8f5e9; }
.error { margin-top: 1.5rem; padding: 1rem; background: #fdecea; }
.meta { margin-top: 2rem; font-size: 0.85rem; color: #555; }";

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn input(out: &mut String, name: &str, label: &str, value: &str, min: u32, max: u32) {
    let _ = write!(
        out,
        r#"<label for="{name}">{label}</label><input id="{name}" name="{name}" type="number" step="any" min="{min}" max="{max}" value="{}" required>"#,
        escape(value)
    );
}

/// Renders the prediction form together with the model metadata.
pub fn render(values: &FormValues, outcome: &Outcome) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title><style>{STYLE}</style></head><body><h1>{}</h1>",
        metadata::NAME,
        metadata::NAME
    );

    out.push_str(r#"<form method="post" action="/">"#);
    input(&mut out, "size", "Size (m²)", &values.size, 40, 120);
    input(&mut out, "bedrooms", "Bedrooms", &values.bedrooms, 1, 5);
    input(&mut out, "age", "Age (years)", &values.age, 1, 35);
    out.push_str(r#"<button type="submit">Estimate price</button></form>"#);

    match outcome {
        Outcome::Empty => {}
        Outcome::Prediction { features, price } => {
            let _ = write!(
                out,
                r#"<div class="result"><h2>Estimated price: ${price:.0}k</h2><p>{} m², {} bedrooms, {} years old</p></div>"#,
                features.size, features.bedrooms, features.age
            );
        }
        Outcome::Error(message) => {
            let _ = write!(out, r#"<div class="error">{}</div>"#, escape(message));
        }
    }

    let _ = write!(
        out,
        r#"<div class="meta"><p>Model: {} (R² {}, RMSE {:.2}k, MAE {:.2}k)</p><p>{}</p></div></body></html>"#,
        metadata::ALGORITHM,
        metadata::R2,
        metadata::RMSE,
        metadata::MAE,
        metadata::EQUATION
    );
    out
}
