//! Fixed schema of the computer listings file.
//!
//! Every column the dashboard reads is named here once. Lookups go through
//! these enums, so a renamed column shows up when the header is matched at
//! load time instead of as a silent `None` deep inside a chart.

use serde::{Serialize, Serializer};

/// Numeric columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NumericColumn {
    ReleaseYear,
    CpuTier,
    CpuCores,
    CpuThreads,
    CpuBaseGhz,
    CpuBoostGhz,
    GpuTier,
    VramGb,
    RamGb,
    StorageGb,
    StorageDriveCount,
    DisplaySizeIn,
    RefreshHz,
    Bluetooth,
    WeightKg,
    WarrantyMonths,
    Price,
    /// Derived at load time, never read from the file.
    PerformanceScore,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 18] = [
        NumericColumn::ReleaseYear,
        NumericColumn::CpuTier,
        NumericColumn::CpuCores,
        NumericColumn::CpuThreads,
        NumericColumn::CpuBaseGhz,
        NumericColumn::CpuBoostGhz,
        NumericColumn::GpuTier,
        NumericColumn::VramGb,
        NumericColumn::RamGb,
        NumericColumn::StorageGb,
        NumericColumn::StorageDriveCount,
        NumericColumn::DisplaySizeIn,
        NumericColumn::RefreshHz,
        NumericColumn::Bluetooth,
        NumericColumn::WeightKg,
        NumericColumn::WarrantyMonths,
        NumericColumn::Price,
        NumericColumn::PerformanceScore,
    ];

    /// Inputs of the performance score formula.
    pub const PERFORMANCE_INPUTS: [NumericColumn; 6] = [
        NumericColumn::CpuTier,
        NumericColumn::GpuTier,
        NumericColumn::CpuCores,
        NumericColumn::VramGb,
        NumericColumn::RamGb,
        NumericColumn::CpuBoostGhz,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NumericColumn::ReleaseYear => "release_year",
            NumericColumn::CpuTier => "cpu_tier",
            NumericColumn::CpuCores => "cpu_cores",
            NumericColumn::CpuThreads => "cpu_threads",
            NumericColumn::CpuBaseGhz => "cpu_base_ghz",
            NumericColumn::CpuBoostGhz => "cpu_boost_ghz",
            NumericColumn::GpuTier => "gpu_tier",
            NumericColumn::VramGb => "vram_gb",
            NumericColumn::RamGb => "ram_gb",
            NumericColumn::StorageGb => "storage_gb",
            NumericColumn::StorageDriveCount => "storage_drive_count",
            NumericColumn::DisplaySizeIn => "display_size_in",
            NumericColumn::RefreshHz => "refresh_hz",
            NumericColumn::Bluetooth => "bluetooth",
            NumericColumn::WeightKg => "weight_kg",
            NumericColumn::WarrantyMonths => "warranty_months",
            NumericColumn::Price => "price",
            NumericColumn::PerformanceScore => "performance_score",
        }
    }

    /// Matches a CSV header. The derived score is never matched.
    pub fn from_header(header: &str) -> Option<Self> {
        let header = header.trim();
        NumericColumn::ALL
            .into_iter()
            .filter(|column| !column.is_derived())
            .find(|column| column.name().eq_ignore_ascii_case(header))
    }

    pub fn is_derived(self) -> bool {
        matches!(self, NumericColumn::PerformanceScore)
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Categorical columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CategoricalColumn {
    DeviceType,
    Brand,
    Model,
    Os,
    FormFactor,
    CpuBrand,
    CpuModel,
    GpuBrand,
    GpuModel,
    StorageType,
    DisplayType,
    Resolution,
    Wifi,
}

impl CategoricalColumn {
    pub const ALL: [CategoricalColumn; 13] = [
        CategoricalColumn::DeviceType,
        CategoricalColumn::Brand,
        CategoricalColumn::Model,
        CategoricalColumn::Os,
        CategoricalColumn::FormFactor,
        CategoricalColumn::CpuBrand,
        CategoricalColumn::CpuModel,
        CategoricalColumn::GpuBrand,
        CategoricalColumn::GpuModel,
        CategoricalColumn::StorageType,
        CategoricalColumn::DisplayType,
        CategoricalColumn::Resolution,
        CategoricalColumn::Wifi,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CategoricalColumn::DeviceType => "device_type",
            CategoricalColumn::Brand => "brand",
            CategoricalColumn::Model => "model",
            CategoricalColumn::Os => "os",
            CategoricalColumn::FormFactor => "form_factor",
            CategoricalColumn::CpuBrand => "cpu_brand",
            CategoricalColumn::CpuModel => "cpu_model",
            CategoricalColumn::GpuBrand => "gpu_brand",
            CategoricalColumn::GpuModel => "gpu_model",
            CategoricalColumn::StorageType => "storage_type",
            CategoricalColumn::DisplayType => "display_type",
            CategoricalColumn::Resolution => "resolution",
            CategoricalColumn::Wifi => "wifi",
        }
    }

    pub fn from_header(header: &str) -> Option<Self> {
        let header = header.trim();
        CategoricalColumn::ALL
            .into_iter()
            .find(|column| column.name().eq_ignore_ascii_case(header))
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Any schema column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Numeric(NumericColumn),
    Categorical(CategoricalColumn),
}

impl Column {
    pub fn name(self) -> &'static str {
        match self {
            Column::Numeric(column) => column.name(),
            Column::Categorical(column) => column.name(),
        }
    }

    /// All schema columns, categorical first as on the statistics page.
    pub fn all() -> impl Iterator<Item = Column> {
        CategoricalColumn::ALL
            .into_iter()
            .map(Column::Categorical)
            .chain(NumericColumn::ALL.into_iter().map(Column::Numeric))
    }
}

impl From<NumericColumn> for Column {
    fn from(column: NumericColumn) -> Self {
        Column::Numeric(column)
    }
}

impl From<CategoricalColumn> for Column {
    fn from(column: CategoricalColumn) -> Self {
        Column::Categorical(column)
    }
}

macro_rules! display_and_serialize_by_name {
    ($($ty:ty),*) => {
        $(
            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.name())
                }
            }

            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.serialize_str(self.name())
                }
            }
        )*
    };
}

display_and_serialize_by_name!(NumericColumn, CategoricalColumn, Column);
