use chrono::NaiveDate;

use super::error::ReportError;

/// The report catalog. Each variant carries its own filter requirements,
/// grouping defaults and column layout; adding a report means adding a
/// variant plus one assembler method, not a new pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    InvoiceRegister,
    DebitNoteRegister,
    CreditNoteRegister,
    CollectionsByCity,
    CollectionsByExecutive,
    AccountStatement,
    PayrollSummary,
    CommissionVoucher,
}

impl ReportType {
    pub fn name(&self) -> &'static str {
        match self {
            ReportType::InvoiceRegister => "invoice-register",
            ReportType::DebitNoteRegister => "debit-note-register",
            ReportType::CreditNoteRegister => "credit-note-register",
            ReportType::CollectionsByCity => "collections-by-city",
            ReportType::CollectionsByExecutive => "collections-by-executive",
            ReportType::AccountStatement => "account-statement",
            ReportType::PayrollSummary => "payroll-summary",
            ReportType::CommissionVoucher => "commission-voucher",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportType::InvoiceRegister => "Invoice Register",
            ReportType::DebitNoteRegister => "Debit Note Register",
            ReportType::CreditNoteRegister => "Credit Note Register",
            ReportType::CollectionsByCity => "Collections by City",
            ReportType::CollectionsByExecutive => "Collections by Executive",
            ReportType::AccountStatement => "Account Statement",
            ReportType::PayrollSummary => "Payroll Summary",
            ReportType::CommissionVoucher => "Commission Voucher",
        }
    }

    /// How rows group when the query does not override it. Operational
    /// reports keep document order so output is stable run to run; payroll
    /// and vouchers sort their group keys.
    pub fn default_grouping(&self) -> Grouping {
        match self {
            ReportType::InvoiceRegister
            | ReportType::DebitNoteRegister
            | ReportType::CreditNoteRegister => Grouping {
                key: GroupBy::City,
                order: GroupOrder::FirstSeen,
            },
            ReportType::CollectionsByCity => Grouping {
                key: GroupBy::Executive,
                order: GroupOrder::FirstSeen,
            },
            ReportType::CollectionsByExecutive => Grouping {
                key: GroupBy::Source,
                order: GroupOrder::FirstSeen,
            },
            ReportType::AccountStatement => Grouping {
                key: GroupBy::Invoice,
                order: GroupOrder::FirstSeen,
            },
            ReportType::PayrollSummary => Grouping {
                key: GroupBy::Area,
                order: GroupOrder::Sorted,
            },
            ReportType::CommissionVoucher => Grouping {
                key: GroupBy::Period,
                order: GroupOrder::Sorted,
            },
        }
    }

    pub fn supported_groupings(&self) -> &'static [GroupBy] {
        match self {
            ReportType::InvoiceRegister => &[GroupBy::City, GroupBy::Executive, GroupBy::Holder],
            ReportType::DebitNoteRegister | ReportType::CreditNoteRegister => &[GroupBy::City],
            ReportType::CollectionsByCity => &[GroupBy::Executive, GroupBy::Holder],
            ReportType::CollectionsByExecutive => &[GroupBy::Source, GroupBy::Invoice],
            ReportType::AccountStatement => &[GroupBy::Invoice],
            ReportType::PayrollSummary => &[GroupBy::Area],
            ReportType::CommissionVoucher => &[GroupBy::Period],
        }
    }

    fn requires_city(&self) -> bool {
        matches!(
            self,
            ReportType::CollectionsByCity | ReportType::AccountStatement | ReportType::PayrollSummary
        )
    }

    fn requires_executive(&self) -> bool {
        matches!(
            self,
            ReportType::CollectionsByExecutive | ReportType::CommissionVoucher
        )
    }

    /// Account statements cover an invoice's whole history; every other
    /// report works on a period.
    fn requires_range(&self) -> bool {
        !matches!(self, ReportType::AccountStatement)
    }
}

/// Attribute rows are grouped under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    City,
    Executive,
    Holder,
    Invoice,
    Source,
    Area,
    Period,
}

impl GroupBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupBy::City => "city",
            GroupBy::Executive => "executive",
            GroupBy::Holder => "holder",
            GroupBy::Invoice => "invoice",
            GroupBy::Source => "source",
            GroupBy::Area => "area",
            GroupBy::Period => "period",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "city" => Some(GroupBy::City),
            "executive" => Some(GroupBy::Executive),
            "holder" => Some(GroupBy::Holder),
            "invoice" => Some(GroupBy::Invoice),
            "source" => Some(GroupBy::Source),
            "area" => Some(GroupBy::Area),
            "period" => Some(GroupBy::Period),
            _ => None,
        }
    }
}

impl std::fmt::Display for GroupBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether groups appear in the order their first row was seen or sorted
/// by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOrder {
    FirstSeen,
    Sorted,
}

#[derive(Debug, Clone, Copy)]
pub struct Grouping {
    pub key: GroupBy,
    pub order: GroupOrder,
}

/// A report request. Which filters are required depends on the report type;
/// `validate` enforces that before any data is read.
#[derive(Debug, Clone)]
pub struct ReportQuery {
    pub report_type: ReportType,
    pub city_code: Option<String>,
    pub executive_id: Option<String>,
    pub invoice_number: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub group_by: Option<GroupBy>,
}

impl ReportQuery {
    pub fn new(report_type: ReportType) -> Self {
        Self {
            report_type,
            city_code: None,
            executive_id: None,
            invoice_number: None,
            date_from: None,
            date_to: None,
            group_by: None,
        }
    }

    pub fn with_city(mut self, city_code: impl Into<String>) -> Self {
        self.city_code = Some(city_code.into());
        self
    }

    pub fn with_executive(mut self, executive_id: impl Into<String>) -> Self {
        self.executive_id = Some(executive_id.into());
        self
    }

    pub fn with_invoice(mut self, invoice_number: impl Into<String>) -> Self {
        self.invoice_number = Some(invoice_number.into());
        self
    }

    pub fn with_range(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.date_from = Some(from);
        self.date_to = Some(to);
        self
    }

    pub fn with_group_by(mut self, group_by: GroupBy) -> Self {
        self.group_by = Some(group_by);
        self
    }

    /// Check the query against its report type's requirements.
    pub fn validate(&self) -> Result<(), ReportError> {
        let report = self.report_type.name();

        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err(ReportError::EmptyDateRange { from, to });
            }
        }

        if self.report_type.requires_range() && (self.date_from.is_none() || self.date_to.is_none())
        {
            return Err(ReportError::MissingField {
                report,
                field: "a date range",
            });
        }

        if self.report_type.requires_city() && self.city_code.is_none() {
            return Err(ReportError::MissingField {
                report,
                field: "a city",
            });
        }

        if self.report_type.requires_executive() && self.executive_id.is_none() {
            return Err(ReportError::MissingField {
                report,
                field: "an executive",
            });
        }

        if let Some(group_by) = self.group_by {
            if !self.report_type.supported_groupings().contains(&group_by) {
                return Err(ReportError::UnsupportedGrouping {
                    report,
                    group_by: group_by.as_str(),
                });
            }
        }

        Ok(())
    }

    /// The effective grouping: the query's override, or the report default.
    pub fn grouping(&self) -> Grouping {
        match self.group_by {
            Some(key) => Grouping {
                key,
                order: self.report_type.default_grouping().order,
            },
            None => self.report_type.default_grouping(),
        }
    }

    /// Whether a date falls inside the query range. Open bounds pass,
    /// so statements without a range see all activity.
    pub fn in_range(&self, date: NaiveDate) -> bool {
        if self.date_from.is_some_and(|from| date < from) {
            return false;
        }
        !self.date_to.is_some_and(|to| date > to)
    }
}
