#![allow(dead_code)]

use crate::dataset::Dataset;
use crate::schema::{CategoricalColumn, NumericColumn};

/// Test helper: six listings across three brands with every chart input present.
pub(crate) fn sample_dataset() -> Dataset {
    let some = |values: &[f64]| values.iter().copied().map(Some).collect::<Vec<_>>();

    Dataset::builder()
        .categorical(
            CategoricalColumn::Brand,
            vec![Some("Acme"), Some("Acme"), Some("Zeta"), Some("Zeta"), Some("Orbit"), None],
        )
        .categorical(
            CategoricalColumn::Model,
            vec![Some("A1"), Some("A2"), Some("Z1"), Some("Z1"), Some("O1"), Some("N1")],
        )
        .categorical(
            CategoricalColumn::Os,
            vec![Some("Windows"), Some("Linux"), Some("Windows"), Some("macOS"), Some("Windows"), Some("Linux")],
        )
        .categorical(
            CategoricalColumn::DeviceType,
            vec![Some("Laptop"), Some("Desktop"), Some("Laptop"), Some("Laptop"), Some("Desktop"), Some("Laptop")],
        )
        .categorical(
            CategoricalColumn::StorageType,
            vec![Some("SSD"), Some("HDD"), Some("SSD"), Some("NVMe"), Some("SSD"), None],
        )
        .numeric(
            NumericColumn::Price,
            vec![Some(800.0), Some(1_500.0), Some(2_500.0), Some(4_000.0), Some(1_200.0), None],
        )
        .numeric(NumericColumn::RamGb, some(&[8.0, 16.0, 32.0, 64.0, 16.0, 8.0]))
        .numeric(NumericColumn::CpuTier, some(&[2.0, 3.0, 4.0, 5.0, 3.0, 1.0]))
        .numeric(NumericColumn::GpuTier, some(&[1.0, 2.0, 4.0, 5.0, 2.0, 1.0]))
        .numeric(NumericColumn::CpuCores, some(&[4.0, 8.0, 12.0, 16.0, 8.0, 4.0]))
        .numeric(NumericColumn::VramGb, some(&[0.0, 4.0, 8.0, 16.0, 4.0, 0.0]))
        .numeric(NumericColumn::CpuBoostGhz, some(&[3.5, 4.2, 4.8, 5.2, 4.0, 3.0]))
        .numeric(NumericColumn::Bluetooth, some(&[1.0, 1.0, 1.0, 1.0, 1.0, 1.0]))
        .build()
        .expect("sample dataset is rectangular")
}
