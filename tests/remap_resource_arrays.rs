//! Integration tests for remapping resource tables across whole sets of classes.
//!
//! The classes are shaped like the output of a resource compiler: every array is
//! built with `const` / `new-array` / populate and published to a static field.

use resremap::{prelude::*, remap::locate_sites};

const V0: Register = Register(0);
const V1: Register = Register(1);
const V2: Register = Register(2);
const V3: Register = Register(3);
const V4: Register = Register(4);
const V5: Register = Register(5);

fn fill(size: Register, array: Register, values: &[u32], field: &str) -> Vec<Instruction> {
    vec![
        Instruction::constant(size, values.len() as i64),
        Instruction::new_array(size, array),
        Instruction::fill_array(array, ArrayPayload::from_u32s(values)),
        Instruction::other(&format!("sput-object {field}"), &[], &[array]),
    ]
}

fn stores(size: Register, array: Register, values: &[u32], field: &str) -> Vec<Instruction> {
    let mut code = vec![
        Instruction::constant(size, values.len() as i64),
        Instruction::new_array(size, array),
    ];
    for (index, value) in values.iter().enumerate() {
        code.push(Instruction::store(array, index as u32, *value));
    }
    code.push(Instruction::other(&format!("sput-object {field}"), &[], &[array]));
    code
}

fn class(name: &str, sites: Vec<Vec<Instruction>>) -> ClassDef {
    let mut body: MethodBody = sites.into_iter().flatten().collect();
    body.push(Instruction::return_void());
    ClassDef::new(name, Some(body))
}

/// Decoded contents of every candidate array of a class, in instruction order.
fn arrays(class: &ClassDef, config: &ResourceConfig) -> Vec<Vec<u32>> {
    let context = resremap::remap::select_class(&class.name, config)
        .unwrap_or_else(|| ClassContext::plain(class.name.clone()));
    let body = class.static_initializer.as_ref().unwrap();
    locate_sites(body, &context)
        .unwrap()
        .sites
        .into_iter()
        .map(|site| site.elements.into_iter().map(u32::from).collect())
        .collect()
}

/// Old → new table of a build that renumbered type 0x01, kept two entries of type 0x02,
/// one of type 0x03 and one styleable attribute.
fn remap_table() -> RemapTable {
    [
        (0x7f01_0000_u32, 0x7f01_0010_u32),
        (0x7f01_0001, 0x7f01_0011),
        (0x7f01_0002, 0x7f01_0012),
        (0x7f01_0003, 0x7f01_0013),
        (0x7f02_0000, 0x7f02_0000),
        (0x7f02_0001, 0x7f02_0001),
        (0x7f03_0000, 0x7f03_0000),
        (0x7f04_0001, 0x7f04_0001),
    ]
    .into_iter()
    .collect()
}

fn scenario() -> Vec<ClassDef> {
    vec![
        class(
            "Lcom/redextest/R$array;",
            vec![
                fill(
                    V0,
                    V1,
                    &[0x7f01_0000, 0x7f01_0001, 0x7f01_0002, 0x7f01_0003],
                    "all_renumbered",
                ),
                fill(V0, V1, &[0x7f02_0000, 0x7f02_0001], "all_kept"),
                fill(V0, V1, &[0x7f03_0000, 0x7f03_0001], "one_deleted"),
            ],
        ),
        class(
            "Lcom/redextest/R$styleable;",
            vec![fill(V0, V1, &[0x7f04_0000, 0x7f04_0001], "CustomView")],
        ),
    ]
}

#[test]
fn test_plain_arrays_shrink_and_styleable_arrays_zero_fill() {
    let config = ResourceConfig::default();
    let table = remap_table();
    let mut classes = scenario();

    let report = ResourceArrayRemapper::new(&config, &table).run(&mut classes);

    assert!(!report.diagnostics().has_any());
    assert_eq!(
        arrays(&classes[0], &config),
        vec![
            vec![0x7f01_0010, 0x7f01_0011, 0x7f01_0012, 0x7f01_0013],
            vec![0x7f02_0000, 0x7f02_0001],
            vec![0x7f03_0000],
        ]
    );
    assert_eq!(
        arrays(&classes[1], &config),
        vec![vec![0, 0x7f04_0001]]
    );

    let lengths: Vec<u32> = report
        .outcome("Lcom/redextest/R$array;")
        .and_then(|outcome| outcome.summary().cloned())
        .unwrap()
        .sites
        .iter()
        .map(|site| site.new_length)
        .collect();
    assert_eq!(lengths, vec![4, 2, 1]);

    let styleable = report
        .outcome("Lcom/redextest/R$styleable;")
        .and_then(|outcome| outcome.summary().cloned())
        .unwrap();
    assert_eq!(styleable.kind, ClassKind::Styleable);
    assert_eq!(styleable.sites[0].original_length, 2);
    assert_eq!(styleable.sites[0].new_length, 2);
    assert_eq!(styleable.sites[0].zeroed, 1);

    let stats = report.stats();
    assert_eq!(stats.classes_remapped, 2);
    assert_eq!(stats.sites, 4);
    assert_eq!(stats.sites_changed, 3);
    assert_eq!(stats.kept, 8);
    assert_eq!(stats.deleted, 2);
    assert_eq!(stats.zeroed, 1);
}

#[test]
fn test_declared_length_matches_written_elements() {
    let config = ResourceConfig::default();
    let table = remap_table();
    let mut classes = scenario();
    ResourceArrayRemapper::new(&config, &table).run(&mut classes);

    let context = ClassContext::plain("Lcom/redextest/R$array;");
    let body = classes[0].static_initializer.as_ref().unwrap();
    for site in locate_sites(body, &context).unwrap().sites {
        let Some(Instruction::BulkFill { payload, .. }) = body.get(match site.population {
            resremap::remap::Population::BulkFill { position, .. } => position,
            resremap::remap::Population::StoreRun { start, .. } => start,
        }) else {
            panic!("expected bulk fill");
        };
        assert_eq!(payload.len(), site.declared_length as usize);
        assert_eq!(payload.width(), ElementWidth::Four);
    }
}

#[test]
fn test_second_run_is_a_no_op() {
    let config = ResourceConfig::default();
    let table = remap_table();
    let mut classes = scenario();
    ResourceArrayRemapper::new(&config, &table).run(&mut classes);

    // after the first run every surviving id maps to itself
    let identity: RemapTable = table.iter().map(|(_, new)| (new, new)).collect();
    let once = classes.clone();
    let report = ResourceArrayRemapper::new(&config, &identity).run(&mut classes);

    assert_eq!(classes, once);
    assert_eq!(report.stats().sites_changed, 0);
}

#[test]
fn test_customized_classes_are_opt_in() {
    let table = remap_table();
    let outer = || {
        class(
            "Lcom/redextest/R;",
            vec![fill(V0, V1, &[0x7f01_0000, 0x7f05_0000], "extra")],
        )
    };

    let mut classes = vec![outer()];
    let report = ResourceArrayRemapper::new(&ResourceConfig::default(), &table).run(&mut classes);
    assert!(report.is_empty());
    assert_eq!(classes[0], outer());

    let config = ResourceConfig::default().customized_class("Lcom/redextest/R;");
    let report = ResourceArrayRemapper::new(&config, &table).run(&mut classes);
    assert_eq!(report.len(), 1);
    assert_eq!(arrays(&classes[0], &config), vec![vec![0x7f01_0010]]);
}

#[test]
fn test_custom_styleable_names() {
    let table = remap_table();
    let config = ResourceConfig::default().styleable_class("R$attrs");
    let mut classes = vec![class(
        "Lcom/redextest/R$attrs;",
        vec![stores(V2, V3, &[0x7f05_0000, 0x7f02_0000, 0x7f05_0001], "Attrs")],
    )];

    ResourceArrayRemapper::new(&config, &table).run(&mut classes);
    assert_eq!(arrays(&classes[0], &config), vec![vec![0, 0x7f02_0000, 0]]);
}

#[test]
fn test_mixed_population_forms_in_one_initializer() {
    let config = ResourceConfig::default();
    let table = remap_table();
    let mut classes = vec![class(
        "Lcom/redextest/R$array;",
        vec![
            stores(V0, V1, &[0x7f03_0001, 0x7f01_0003, 0x7f03_0000], "first"),
            fill(V2, V3, &[0x7f05_0000], "second"),
            stores(V4, V5, &[0x7f02_0001], "third"),
        ],
    )];

    let report = ResourceArrayRemapper::new(&config, &table).run(&mut classes);

    assert_eq!(
        arrays(&classes[0], &config),
        vec![vec![0x7f01_0013, 0x7f03_0000], vec![0x7f02_0001]]
    );
    // the emptied array is no longer a candidate but is still allocated
    let body = classes[0].static_initializer.as_ref().unwrap();
    assert!(body.iter().any(|i| *i == Instruction::constant(V2, 0)));
    assert!(body.iter().any(|i| *i == Instruction::new_array(V2, V3)));
    assert_eq!(report.stats().deleted, 2);
}

#[test]
fn test_failures_stay_inside_their_class() {
    let config = ResourceConfig::default();
    let table = remap_table();
    let narrow = class(
        "Lcom/redextest/R$integer;",
        vec![
            fill(V0, V1, &[0x7f01_0000], "ok_but_same_class"),
            vec![
                Instruction::constant(V2, 2),
                Instruction::new_array(V2, V3),
                Instruction::fill_array(
                    V3,
                    ArrayPayload::from_elements(ElementWidth::Two, &[1, 2]).unwrap(),
                ),
            ],
        ],
    );
    let malformed = class(
        "Lcom/redextest/R$string;",
        vec![
            vec![
                Instruction::other("invoke-static", &[], &[]),
                Instruction::other("move-result", &[V0], &[]),
                Instruction::new_array(V0, V1),
                Instruction::fill_array(V1, ArrayPayload::from_u32s(&[0x7f01_0000])),
            ],
            fill(V2, V3, &[0x7f01_0001, 0x7f05_0000], "still_rewritten"),
        ],
    );
    let mut classes = vec![narrow.clone(), malformed.clone()];
    classes.extend(scenario());

    let report = ResourceArrayRemapper::new(&config, &table).run(&mut classes);

    assert_eq!(classes[0], narrow);
    assert!(matches!(
        report.outcome("Lcom/redextest/R$integer;"),
        Some(ClassOutcome::Aborted(Error::PayloadWidthMismatch {
            expected: 4,
            actual: 2,
            ..
        }))
    ));

    assert_ne!(classes[1], malformed);
    let summary = report
        .outcome("Lcom/redextest/R$string;")
        .and_then(|outcome| outcome.summary().cloned())
        .unwrap();
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.sites.len(), 1);
    assert_eq!(summary.sites[0].new_length, 1);

    assert_eq!(
        arrays(&classes[3], &config),
        vec![vec![0, 0x7f04_0001]]
    );
    assert_eq!(report.aborted_classes().len(), 1);
    assert_eq!(report.diagnostics().error_count(), 1);
    assert_eq!(report.diagnostics().warning_count(), 1);
}

#[test]
fn test_many_classes_in_parallel() {
    let config = ResourceConfig::default();
    let table = remap_table();
    let mut classes: Vec<ClassDef> = (0..64)
        .map(|n| {
            class(
                &format!("Lcom/redextest/p{n}/R$array;"),
                vec![fill(V0, V1, &[0x7f03_0001, 0x7f03_0000], "table")],
            )
        })
        .collect();

    let report = ResourceArrayRemapper::new(&config, &table).run(&mut classes);

    assert_eq!(report.len(), 64);
    assert_eq!(report.stats().deleted, 64);
    for class in &classes {
        assert_eq!(arrays(class, &config), vec![vec![0x7f03_0000]]);
    }
}
