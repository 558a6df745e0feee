use std::fmt;

use serde::{Deserialize, Serialize};

use super::holder::compose_name;

/// Organizational area an employee belongs to. The sales area keeps its
/// legacy wire tag `pyf`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Area {
    #[serde(rename = "administrative")]
    Administrative,
    #[serde(rename = "pyf", alias = "sales")]
    Sales,
    #[serde(rename = "service")]
    Service,
}

impl Area {
    pub fn as_str(&self) -> &'static str {
        match self {
            Area::Administrative => "administrative",
            Area::Sales => "pyf",
            Area::Service => "service",
        }
    }

    /// Heading used when a report groups employees by area.
    pub fn label(&self) -> &'static str {
        match self {
            Area::Administrative => "Administrative",
            Area::Sales => "Sales (PyF)",
            Area::Service => "Service",
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An employee, scoped to a city. Payroll records keep role codes rather
/// than titles; [`role_title`] maps them back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub city_code: String,
    pub first_name1: String,
    #[serde(default)]
    pub first_name2: Option<String>,
    pub last_name1: String,
    #[serde(default)]
    pub last_name2: Option<String>,
    pub role: String,
    pub area: Area,
}

impl Employee {
    /// Full display name, surnames first.
    pub fn display_name(&self) -> String {
        compose_name(
            &self.last_name1,
            self.last_name2.as_deref(),
            &self.first_name1,
            self.first_name2.as_deref(),
        )
    }

    /// Human title for this employee's role code, or the raw code when the
    /// code is not known under their area.
    pub fn role_title(&self) -> &str {
        role_title(self.area, &self.role).unwrap_or(&self.role)
    }
}

/// Fixed role-code table. Codes are scoped to an area: "EC" is an account
/// executive only under the administrative area.
pub fn role_title(area: Area, code: &str) -> Option<&'static str> {
    match (area, code) {
        (Area::Administrative, "EC") => Some("Ejecutivo de Cuenta"),
        (Area::Administrative, "AUX") => Some("Auxiliar Administrativo"),
        (Area::Administrative, "SEC") => Some("Secretaria"),
        (Area::Administrative, "DIR") => Some("Director Administrativo"),
        (Area::Sales, "AS") => Some("Asesor"),
        (Area::Sales, "SUP") => Some("Supervisor"),
        (Area::Sales, "GER") => Some("Gerente"),
        (Area::Sales, "SGER") => Some("Subgerente"),
        (Area::Service, "TEC") => Some("Tecnico de Servicio"),
        (Area::Service, "COOR") => Some("Coordinador de Servicio"),
        _ => None,
    }
}
