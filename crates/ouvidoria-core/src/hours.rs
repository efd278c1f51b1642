//! Business-hours calendar for the intake desk.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;

use crate::config::BusinessHours;

const OPEN_MESSAGE: &str = "Estamos em horário de atendimento.";

/// Business-hours status as reported to the browser UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessHoursStatus {
    pub eh_horario_comercial: bool,
    /// `HH:MM`
    pub hora_atual: String,
    /// `DD/MM/YYYY`
    pub data_atual: String,
    pub dia_semana: String,
    pub mensagem: String,
}

/// Portuguese weekday name.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Domingo",
        Weekday::Mon => "Segunda-feira",
        Weekday::Tue => "Terça-feira",
        Weekday::Wed => "Quarta-feira",
        Weekday::Thu => "Quinta-feira",
        Weekday::Fri => "Sexta-feira",
        Weekday::Sat => "Sábado",
    }
}

/// Evaluate `now` against the configured window.
pub fn check_business_hours(now: NaiveDateTime, hours: BusinessHours) -> BusinessHoursStatus {
    let weekday = now.weekday();
    let weekend = matches!(weekday, Weekday::Sat | Weekday::Sun);
    let hour = now.hour();
    let open = !weekend && hour >= hours.open_hour && hour < hours.close_hour;

    let mensagem = if open {
        OPEN_MESSAGE.to_string()
    } else {
        format!(
            "Estamos fora do horário comercial. Nosso horário de atendimento é de segunda a \
             sexta-feira, das {:02}:00 às {:02}:00. Sua mensagem será respondida no próximo dia útil.",
            hours.open_hour, hours.close_hour
        )
    };

    BusinessHoursStatus {
        eh_horario_comercial: open,
        hora_atual: now.format("%H:%M").to_string(),
        data_atual: now.format("%d/%m/%Y").to_string(),
        dia_semana: weekday_name(weekday).to_string(),
        mensagem,
    }
}
