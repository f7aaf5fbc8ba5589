//! User-facing text and date formats per locale

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported display locales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    #[serde(rename = "en-US")]
    EnUs,
}

/// Static strings for one locale
#[derive(Debug)]
pub struct Strings {
    /// chrono format for the day/month pair
    pub day_format: &'static str,
    /// chrono format for the hour/minute pair
    pub hour_format: &'static str,
    pub greeting: &'static str,
    pub loading: &'static str,
    pub list_title: &'static str,
    pub water_at: &'static str,
    pub no_plants: &'static str,
    pub remove_title: &'static str,
    pub confirm_yes: &'static str,
    pub confirm_no: &'static str,
    pub remove_failed: &'static str,
    pub reminder_already_cancelled: &'static str,
    pub load_failed: &'static str,
    pub notification_title: &'static str,
    pub about_label: &'static str,
    pub water_tips_label: &'static str,
    pub next_watering_label: &'static str,
    pub list_help: &'static str,
    pub detail_help: &'static str,
}

static PT_BR: Strings = Strings {
    day_format: "%d/%m",
    hour_format: "%H:%M",
    greeting: "Olá,",
    loading: "Carregando...",
    list_title: "Próximas regadas",
    water_at: "Regar às",
    no_plants: "Nenhuma planta salva ainda.",
    remove_title: "Remover",
    confirm_yes: "Sim",
    confirm_no: "Não",
    remove_failed: "Não foi possível remover.",
    reminder_already_cancelled: "O lembrete já foi cancelado.",
    load_failed: "Não foi possível carregar suas plantas.",
    notification_title: "Heeey, 🌱",
    about_label: "Sobre",
    water_tips_label: "Dica de rega",
    next_watering_label: "Próxima rega",
    list_help: "↑/↓ mover  ←/d remover  Enter abrir  r recarregar  q sair",
    detail_help: "Esc voltar  q sair",
};

static EN_US: Strings = Strings {
    day_format: "%m/%d",
    hour_format: "%I:%M %p",
    greeting: "Hello,",
    loading: "Loading...",
    list_title: "Upcoming waterings",
    water_at: "Water at",
    no_plants: "No plants saved yet.",
    remove_title: "Remove",
    confirm_yes: "Yes",
    confirm_no: "No",
    remove_failed: "Could not remove the plant.",
    reminder_already_cancelled: "Its reminder was already cancelled.",
    load_failed: "Could not load your plants.",
    notification_title: "Heeey, 🌱",
    about_label: "About",
    water_tips_label: "Watering tip",
    next_watering_label: "Next watering",
    list_help: "↑/↓ move  ←/d remove  Enter open  r reload  q quit",
    detail_help: "Esc back  q quit",
};

/// Coarse distance between two instants, bucketed the way people say it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distance {
    LessThanAMinute,
    Minutes(i64),
    AboutHours(i64),
    Days(i64),
    AboutMonths(i64),
    Months(i64),
    AboutYears(i64),
    OverYears(i64),
    AlmostYears(i64),
}

impl Locale {
    pub fn strings(self) -> &'static Strings {
        match self {
            Locale::PtBr => &PT_BR,
            Locale::EnUs => &EN_US,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Locale::PtBr => "pt-BR",
            Locale::EnUs => "en-US",
        }
    }

    /// Spell out a distance, e.g. "about 2 hours" or "cerca de 2 horas"
    pub fn describe(self, distance: Distance) -> String {
        fn plural(count: i64, one: &str, other: &str) -> String {
            if count == 1 {
                one.to_string()
            } else {
                other.replace("{}", &count.to_string())
            }
        }

        match self {
            Locale::EnUs => match distance {
                Distance::LessThanAMinute => "less than a minute".to_string(),
                Distance::Minutes(n) => plural(n, "1 minute", "{} minutes"),
                Distance::AboutHours(n) => plural(n, "about 1 hour", "about {} hours"),
                Distance::Days(n) => plural(n, "1 day", "{} days"),
                Distance::AboutMonths(n) => plural(n, "about 1 month", "about {} months"),
                Distance::Months(n) => plural(n, "1 month", "{} months"),
                Distance::AboutYears(n) => plural(n, "about 1 year", "about {} years"),
                Distance::OverYears(n) => plural(n, "over 1 year", "over {} years"),
                Distance::AlmostYears(n) => plural(n, "almost 1 year", "almost {} years"),
            },
            Locale::PtBr => match distance {
                Distance::LessThanAMinute => "menos de um minuto".to_string(),
                Distance::Minutes(n) => plural(n, "1 minuto", "{} minutos"),
                Distance::AboutHours(n) => plural(n, "cerca de 1 hora", "cerca de {} horas"),
                Distance::Days(n) => plural(n, "1 dia", "{} dias"),
                Distance::AboutMonths(n) => plural(n, "cerca de 1 mês", "cerca de {} meses"),
                Distance::Months(n) => plural(n, "1 mês", "{} meses"),
                Distance::AboutYears(n) => plural(n, "cerca de 1 ano", "cerca de {} anos"),
                Distance::OverYears(n) => plural(n, "mais de 1 ano", "mais de {} anos"),
                Distance::AlmostYears(n) => plural(n, "quase 1 ano", "quase {} anos"),
            },
        }
    }

    /// Spotlight message for the soonest watering
    pub fn next_watering_message(self, plant_name: &str, distance: &str, overdue: bool) -> String {
        match (self, overdue) {
            (Locale::EnUs, false) => {
                format!("Don't forget to water the {} in {}.", plant_name, distance)
            }
            (Locale::EnUs, true) => {
                format!("The {} was due for watering {} ago.", plant_name, distance)
            }
            (Locale::PtBr, false) => {
                format!("Não esqueça de regar a {} em {}.", plant_name, distance)
            }
            (Locale::PtBr, true) => {
                format!("A {} precisava ser regada há {}.", plant_name, distance)
            }
        }
    }

    pub fn remove_prompt(self, plant_name: &str) -> String {
        match self {
            Locale::EnUs => format!("Do you want to remove the {}?", plant_name),
            Locale::PtBr => format!("Deseja remover a {}?", plant_name),
        }
    }

    pub fn notification_body(self, plant_name: &str) -> String {
        match self {
            Locale::EnUs => format!("Time to take care of your {}", plant_name),
            Locale::PtBr => format!("Está na hora de cuidar da sua {}", plant_name),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "pt-br" | "pt" => Ok(Locale::PtBr),
            "en-us" | "en" => Ok(Locale::EnUs),
            other => Err(format!("Unsupported locale '{}'. Use 'pt-BR' or 'en-US'", other)),
        }
    }
}
