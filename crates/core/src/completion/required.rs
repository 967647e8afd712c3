use crate::validation::ModuleKind;

const B0: &[&str] = &[
    "companyName",
    "registrationNumber",
    "naceCode",
    "staffCount",
    "country",
    "reportingPeriod.startDate",
    "reportingPeriod.endDate",
];

const B1: &[&str] = &["reportingOption", "reportingBasis", "reportingFramework.primaryStandard"];

const B2: &[&str] = &["practices"];

const B3: &[&str] =
    &["scope1Total", "scope2LocationBased", "scope2MarketBased", "totalEnergyConsumption"];

const B8: &[&str] = &[
    "totalEmployees",
    "employeesByContract.permanent",
    "employeesByContract.temporary",
    "employeesByGender.male",
    "employeesByGender.female",
];

/// Fields that must be filled for a module to count as complete.
/// Modules without dedicated rules have none.
pub fn required_fields(kind: ModuleKind) -> &'static [&'static str] {
    match kind {
        ModuleKind::B0 => B0,
        ModuleKind::B1 => B1,
        ModuleKind::B2 => B2,
        ModuleKind::B3 => B3,
        ModuleKind::B8 => B8,
        ModuleKind::Generic => &[],
    }
}
