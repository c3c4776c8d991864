use axiomkit_xlsx_record::{
    EnumCoerceMode, FieldPath, SpecHeaderDecision, SpecXlsxExportOptions, SpecXlsxImportOptions,
    XlsxRecord, XlsxRecordError, build_export_grid, export_records, export_records_with_options,
    export_records_with_policies, import_records, import_records_with_options, read_sheet_rows,
};
use chrono::NaiveDateTime;
use rust_xlsxwriter::Workbook;

#[derive(Debug, Default, Clone, PartialEq, XlsxRecord)]
pub struct Address {
    pub city: String,
    pub zip: String,
}

#[derive(Debug, Default, Clone, PartialEq, XlsxRecord)]
pub struct Employee {
    #[xlsx(label = "ID")]
    pub id: i64,
    pub name: String,
    pub salary: f64,
    pub active: bool,
    pub hired_at: NaiveDateTime,
    pub manager_id: Option<i64>,
    #[xlsx(nested)]
    pub home: Address,
    #[xlsx(nested)]
    pub office: Option<Address>,
    #[xlsx(label = "-")]
    pub note: String,
}

#[derive(Debug, Default, Clone, PartialEq, XlsxRecord)]
pub struct Triple {
    pub a: String,
    pub b: String,
    pub c: String,
}

#[derive(Debug, Default, Clone, PartialEq, XlsxRecord)]
pub struct Counter {
    pub total: u64,
    pub delta: i64,
    pub slot: usize,
}

fn ts(text: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn employees() -> Vec<Employee> {
    vec![
        Employee {
            id: 1,
            name: "Alice".to_string(),
            salary: 52000.5,
            active: true,
            hired_at: ts("2021-03-01 09:30:00"),
            manager_id: None,
            home: Address {
                city: "Oslo".to_string(),
                zip: "0150".to_string(),
            },
            office: Some(Address {
                city: "Bergen".to_string(),
                zip: "5003".to_string(),
            }),
            note: "internal".to_string(),
        },
        Employee {
            id: 2,
            name: "Bob\nJr.".to_string(),
            salary: 0.25,
            active: false,
            hired_at: ts("2023-11-15 00:00:00"),
            manager_id: Some(1),
            home: Address {
                city: "Trondheim".to_string(),
                zip: "7010".to_string(),
            },
            office: None,
            note: String::new(),
        },
    ]
}

fn triple_header_policy(path: &FieldPath) -> Option<SpecHeaderDecision> {
    match path.as_str() {
        "a" => Some(SpecHeaderDecision::ordered("A", 2)),
        "b" => Some(SpecHeaderDecision::ordered("B", 1)),
        "c" => Some(SpecHeaderDecision::label("C")),
        _ => None,
    }
}

#[test]
fn test_round_trip_restores_every_mapped_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("staff.xlsx");
    let l_input = employees();

    let report = export_records(&l_input, &path, "Staff").unwrap();
    assert_eq!(report.sheet_name, "Staff");
    assert_eq!(report.n_rows, 2);
    assert_eq!(report.n_cols, 10);
    assert!(report.warnings.is_empty());

    let l_output: Vec<Employee> = import_records(&path, "Staff").unwrap();
    let l_expected: Vec<Employee> = l_input
        .into_iter()
        .map(|mut employee| {
            employee.note = String::new();
            employee
        })
        .collect();
    assert_eq!(l_output, l_expected);
}

#[test]
fn test_export_flattens_nested_records_and_drops_excluded_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("staff.xlsx");
    export_records(&employees(), &path, "Staff").unwrap();

    let l_rows = read_sheet_rows(&path, "Staff").unwrap();
    assert_eq!(
        l_rows[0],
        vec![
            "ID",
            "name",
            "salary",
            "active",
            "hired_at",
            "manager_id",
            "home.city",
            "home.zip",
            "office.city",
            "office.zip",
        ]
    );
    assert_eq!(
        l_rows[1],
        vec![
            "1",
            "Alice",
            "52000.5",
            "true",
            "2021-03-01 09:30:00",
            "",
            "Oslo",
            "0150",
            "Bergen",
            "5003",
        ]
    );
    assert_eq!(l_rows[2][8], "");
    assert!(!l_rows[0].iter().any(|label| label == "note"));
}

#[test]
fn test_header_policy_orders_columns_and_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("triple.xlsx");
    let l_input = vec![Triple {
        a: "x".to_string(),
        b: "y".to_string(),
        c: "z".to_string(),
    }];

    export_records_with_policies(
        &l_input,
        &path,
        "Data",
        triple_header_policy,
        |_: &Triple, _: &FieldPath| None,
    )
    .unwrap();

    let l_rows = read_sheet_rows(&path, "Data").unwrap();
    assert_eq!(l_rows[0], vec!["B", "A", "C"]);
    assert_eq!(l_rows[1], vec!["y", "x", "z"]);

    let options = SpecXlsxImportOptions {
        header_policy: Some(Box::new(triple_header_policy)),
        ..Default::default()
    };
    let l_output: Vec<Triple> = import_records_with_options(&path, "Data", &options).unwrap();
    assert_eq!(l_output, l_input);
}

#[test]
fn test_cell_value_policy_overrides_rendering() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("masked.xlsx");

    export_records_with_policies(
        &employees(),
        &path,
        "Staff",
        |path: &FieldPath| match path.as_str() {
            "id" | "name" => Some(SpecHeaderDecision::label(path.as_str())),
            _ => None,
        },
        |employee: &Employee, path: &FieldPath| {
            (path.as_str() == "name").then(|| format!("#{}", employee.id))
        },
    )
    .unwrap();

    let l_rows = read_sheet_rows(&path, "Staff").unwrap();
    assert_eq!(l_rows[0], vec!["id", "name"]);
    assert_eq!(l_rows[1], vec!["1", "#1"]);
    assert_eq!(l_rows[2], vec!["2", "#2"]);
}

#[test]
fn test_malformed_cells_degrade_to_zero_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("manual.xlsx");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Staff").unwrap();
    for (n_col, c_label) in ["ID", "name", "active", "hired_at", "salary"]
        .iter()
        .enumerate()
    {
        worksheet.write_string(0, n_col as u16, *c_label).unwrap();
    }
    worksheet.write_string(1, 0, "abc").unwrap();
    worksheet.write_string(1, 1, "Carol").unwrap();
    worksheet.write_string(1, 2, "yes").unwrap();
    worksheet.write_string(1, 3, "not a date").unwrap();
    worksheet.write_number(1, 4, 12.5).unwrap();
    workbook.save(&path).unwrap();

    let l_output: Vec<Employee> = import_records(&path, "Staff").unwrap();
    assert_eq!(l_output.len(), 1);
    assert_eq!(l_output[0].id, 0);
    assert_eq!(l_output[0].name, "Carol");
    assert!(!l_output[0].active);
    assert_eq!(l_output[0].hired_at, NaiveDateTime::default());
    assert_eq!(l_output[0].salary, 12.5);
    assert_eq!(l_output[0].office, None);
}

#[test]
fn test_strict_mode_reports_offending_cell() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("strict.xlsx");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, "ID").unwrap();
    worksheet.write_string(1, 0, "7").unwrap();
    worksheet.write_string(2, 0, "abc").unwrap();
    workbook.save(&path).unwrap();

    let options = SpecXlsxImportOptions {
        coerce_mode: EnumCoerceMode::Strict,
        ..Default::default()
    };
    let err = import_records_with_options::<Employee>(&path, "Sheet1", &options).unwrap_err();
    match err {
        XlsxRecordError::CellParse { row, label, .. } => {
            assert_eq!(row, 3);
            assert_eq!(label, "ID");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_empty_export_is_rejected_without_creating_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.xlsx");

    let err = export_records::<Employee>(&[], &path, "Staff").unwrap_err();
    assert!(matches!(err, XlsxRecordError::EmptyInput));
    assert!(!path.exists());
}

#[test]
fn test_invalid_sheet_name_is_rejected_without_creating_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.xlsx");

    let err = export_records(&employees(), &path, "a/b").unwrap_err();
    assert!(matches!(err, XlsxRecordError::InvalidSheetName { .. }));
    assert!(!path.exists());
}

#[test]
fn test_header_only_and_missing_sheets_are_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("header_only.xlsx");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Staff").unwrap();
    worksheet.write_string(0, 0, "ID").unwrap();
    workbook.save(&path).unwrap();

    let err = import_records::<Employee>(&path, "Staff").unwrap_err();
    assert!(matches!(err, XlsxRecordError::InvalidSheet { .. }));
    assert!(err.to_string().contains("invalid or empty sheet"));

    let err = import_records::<Employee>(&path, "Nope").unwrap_err();
    assert!(matches!(err, XlsxRecordError::InvalidSheet { .. }));
}

#[test]
fn test_missing_file_is_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = import_records::<Employee>(dir.path().join("missing.xlsx"), "Staff").unwrap_err();
    assert!(matches!(err, XlsxRecordError::Open { .. }));
}

#[test]
fn test_width_hint_is_capped() {
    let mut employee = employees().remove(0);
    employee.name = "n".repeat(200);

    let grid = build_export_grid(&[employee.clone()], &SpecXlsxExportOptions::default()).unwrap();
    assert_eq!(grid.columns[1].width_hint, 80);
    assert_eq!(grid.columns[0].width_hint, 4);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wide.xlsx");
    export_records_with_options(&[employee], &path, "Staff", &SpecXlsxExportOptions::default())
        .unwrap();
    let l_rows = read_sheet_rows(&path, "Staff").unwrap();
    assert_eq!(l_rows[1][1].len(), 200);
}

#[test]
fn test_integer_extremes_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("counters.xlsx");
    let l_input = vec![
        Counter {
            total: u64::MAX,
            delta: i64::MIN,
            slot: usize::MAX,
        },
        Counter {
            total: 0,
            delta: i64::MAX,
            slot: 0,
        },
    ];

    export_records(&l_input, &path, "Counters").unwrap();
    let l_rows = read_sheet_rows(&path, "Counters").unwrap();
    assert_eq!(l_rows[1][0], "18446744073709551615");

    let options = SpecXlsxImportOptions {
        coerce_mode: EnumCoerceMode::Strict,
        ..Default::default()
    };
    let l_output: Vec<Counter> = import_records_with_options(&path, "Counters", &options).unwrap();
    assert_eq!(l_output, l_input);
}

#[test]
fn test_duplicate_labels_import_into_first_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pair.xlsx");
    let same_label = |_: &FieldPath| Some(SpecHeaderDecision::label("X"));
    let l_input = vec![Triple {
        a: "first".to_string(),
        b: "second".to_string(),
        c: "third".to_string(),
    }];

    let report = export_records_with_policies(
        &l_input,
        &path,
        "Data",
        same_label,
        |_: &Triple, _: &FieldPath| None,
    )
    .unwrap();
    assert_eq!(report.warnings.len(), 1);

    let options = SpecXlsxImportOptions {
        header_policy: Some(Box::new(same_label)),
        ..Default::default()
    };
    let l_output: Vec<Triple> = import_records_with_options(&path, "Data", &options).unwrap();
    assert_eq!(l_output[0].a, "first");
    assert_eq!(l_output[0].b, "");
    assert_eq!(l_output[0].c, "");
}
