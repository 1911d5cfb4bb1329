//! Source path templates and artifact names.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum NamingError {
    #[error("unknown placeholder {{{placeholder}}} in '{template}'")]
    UnknownPlaceholder { placeholder: String, template: String },

    #[error("unclosed placeholder in '{0}'")]
    Unclosed(String),
}

/// Values substituted into a path template.
#[derive(Debug, Clone)]
pub struct TemplateContext<'a> {
    pub instrument: &'a str,
    pub site: &'a str,
    pub version: &'a str,
    pub mode: &'a str,
    pub date: NaiveDate,
}

impl TemplateContext<'_> {
    fn lookup(&self, placeholder: &str) -> Option<String> {
        let value = match placeholder {
            "instrument" => self.instrument.to_string(),
            "site" => self.site.to_string(),
            "version" => self.version.to_string(),
            "mode" => self.mode.to_string(),
            "date" => self.date.format("%Y%m%d").to_string(),
            "iso_date" => self.date.format("%Y-%m-%d").to_string(),
            "year" => self.date.format("%Y").to_string(),
            "month" => self.date.format("%m").to_string(),
            "day" => self.date.format("%d").to_string(),
            _ => return None,
        };
        Some(value)
    }
}

/// Replace every `{placeholder}` in `template`.
///
/// Known placeholders: `instrument`, `site`, `version`, `mode`, `date`
/// (YYYYMMDD), `iso_date` (YYYY-MM-DD), `year`, `month` and `day`.
pub fn expand_template(template: &str, ctx: &TemplateContext<'_>) -> Result<String, NamingError> {
    let mut result = String::with_capacity(template.len() + 32);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| NamingError::Unclosed(template.to_string()))?;
        let placeholder = &after[..close];
        let value = ctx
            .lookup(placeholder)
            .ok_or_else(|| NamingError::UnknownPlaceholder {
                placeholder: placeholder.to_string(),
                template: template.to_string(),
            })?;
        result.push_str(&value);
        rest = &after[close + 1..];
    }
    result.push_str(rest);

    Ok(result)
}

/// Check that `template` only uses known placeholders.
pub fn check_template(template: &str) -> Result<(), NamingError> {
    let ctx = TemplateContext {
        instrument: "",
        site: "",
        version: "",
        mode: "",
        date: NaiveDate::MIN,
    };
    expand_template(template, &ctx).map(|_| ())
}

/// What a figure shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Product {
    /// Wind speed heatmap with direction arrows
    Wind,
    /// One variable as a heatmap
    Variable(String),
    /// Several variables stacked
    Multipanel,
}

impl Product {
    /// Product part of a rolling artifact name.
    pub fn slug(&self) -> String {
        match self {
            Product::Wind => "wind-speed-direction".to_string(),
            Product::Variable(name) => name.to_lowercase(),
            Product::Multipanel => "multipanel".to_string(),
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &str {
        match self {
            Product::Wind => "wind",
            Product::Variable(name) => name,
            Product::Multipanel => "multipanel",
        }
    }
}

/// `<prefix>_<mode>-mode_<product>_last-<hours>-hours`, without extension.
pub fn rolling_artifact_name(prefix: &str, mode: &str, product: &Product, window_days: u32) -> String {
    format!(
        "{}_{}-mode_{}_last-{}-hours",
        prefix,
        mode,
        product.slug(),
        window_hours(window_days)
    )
}

/// File stem of a day plot.
pub fn day_artifact_name(product: &Product) -> String {
    match product {
        Product::Wind => "horizontal_winds".to_string(),
        Product::Variable(name) if name.contains("signal_to_noise") => "snr".to_string(),
        Product::Variable(name) if name == "upward_air_velocity" => "upward_wind".to_string(),
        other => other.slug(),
    }
}

pub fn window_hours(window_days: u32) -> u32 {
    window_days * 24
}

/// Title of a rolling plot.
pub fn window_title(window_days: u32) -> String {
    format!("Last {} hours", window_hours(window_days))
}

/// Title of a day plot.
///
/// Day runs draw wind and single-variable plots only; any other product is
/// titled by its label.
pub fn day_title(product: &Product, date: NaiveDate) -> String {
    let subject = match product {
        Product::Wind => "Wind speed and direction",
        other => other.label(),
    };
    format!("{} - {}", subject, date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(date: NaiveDate) -> TemplateContext<'static> {
        TemplateContext {
            instrument: "ncas-radar-wind-profiler-1",
            site: "cdao",
            version: "v1.0",
            mode: "low",
            date,
        }
    }

    #[test]
    fn test_expand_zero_pads_date_parts() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(
            expand_template("{year}/{month}/{day}/{date}/{iso_date}", &ctx(date)).unwrap(),
            "2024/03/05/20240305/2024-03-05"
        );
    }

    #[test]
    fn test_expand_without_placeholders() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(expand_template("plain.nc", &ctx(date)).unwrap(), "plain.nc");
    }

    #[test]
    fn test_unclosed_placeholder() {
        assert_eq!(
            check_template("{instrument"),
            Err(NamingError::Unclosed("{instrument".to_string()))
        );
    }
}
