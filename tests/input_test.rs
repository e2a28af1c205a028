use std::path::PathBuf;

use approx::assert_relative_eq;
use glob::glob;

use planit_input::DemandKey;
use planit_input::DuplicatePolicy;
use planit_input::InputConfig;
use planit_input::InputError;
use planit_input::PlanitInput;
use planit_input::DEFAULT_MODE_ID;


fn env_config(env_dir: &str) -> PathBuf {
    let mut path = PathBuf::from("tests/envs");
    path.push(env_dir);
    path.push("config.yaml");
    path
}

#[test]
fn test_simple_env() {
    let input = PlanitInput::from_cfg(&env_config("simple")).unwrap();
    let registry = &input.registry;

    // no modes in the network, so everything runs on the default mode
    assert_eq!(registry.modes.ids().collect::<Vec<_>>(), vec![DEFAULT_MODE_ID]);
    assert_eq!(registry.zones.ids().collect::<Vec<_>>(), vec!["O1", "O2", "O3"]);
    assert_eq!(registry.traveler_types.len(), 1);
    assert_eq!(registry.user_classes.len(), 1);

    let am = registry.time_periods.get("am").unwrap();
    assert_eq!((am.start_time_s, am.duration_s), (7 * 3600, 7200));
    assert_eq!(am.name.as_deref(), Some("Morning peak"));
    assert_eq!(registry.time_periods.get("ip").unwrap().duration_s, 5400);
    assert_eq!(registry.time_periods.get("pm").unwrap().end_time_s(), 18 * 3600);

    let keys: Vec<DemandKey> = input.demands.keys().into_iter().cloned().collect();
    assert_eq!(keys, vec![DemandKey::new(DEFAULT_MODE_ID, "am"),
                          DemandKey::new(DEFAULT_MODE_ID, "ip"),
                          DemandKey::new(DEFAULT_MODE_ID, "pm")]);

    let am = input.demands.get(DEFAULT_MODE_ID, "am").unwrap();
    assert_relative_eq!(am.get_by_ordinal(0, 1), 5.);
    assert_relative_eq!(am.get_by_ordinal(0, 2), 3.);
    assert_relative_eq!(am.get_by_ordinal(2, 0), 7.);
    assert_relative_eq!(am.total(), 15.);

    let ip = input.demands.get(DEFAULT_MODE_ID, "ip").unwrap();
    assert_relative_eq!(ip.get_by_ordinal(1, 2), 9.);
    assert_relative_eq!(ip.total(), 9.);

    let pm = input.demands.get(DEFAULT_MODE_ID, "pm").unwrap();
    for oo in 0..3 {
        assert_relative_eq!(pm.get_by_ordinal(oo, oo), 0.);
    }
    assert_relative_eq!(pm.get_by_ordinal(0, 2), 2.);
    assert_relative_eq!(pm.get_by_ordinal(2, 1), 6.);
    assert_relative_eq!(pm.total(), 21.);
}

#[test]
fn test_csv_zones_env() {
    let input = PlanitInput::from_cfg(&env_config("csv-zones")).unwrap();
    let registry = &input.registry;
    assert_eq!(registry.zones.get("south").unwrap().ordinal, 1);
    assert_eq!(registry.user_classes.get("hauliers").unwrap().traveler_type_id, "freight");

    let cars = input.demands.get("car", "day").unwrap();
    assert_eq!(cars.as_array(), &ndarray::arr2(&[[10., 20.], [30., 40.]]));

    // hgv demand is scaled by its pcu of 2.5
    let hgvs = input.demands.get("hgv", "day").unwrap();
    let north = registry.zones.get("north").unwrap();
    let south = registry.zones.get("south").unwrap();
    assert_relative_eq!(hgvs.get(south, north), 10.);
    assert_relative_eq!(hgvs.get(north, south), 5.);
    assert_relative_eq!(hgvs.get(north, north), 0.);
}

#[test]
fn test_combined_document_env() {
    let input = PlanitInput::from_cfg(&env_config("combined")).unwrap();
    assert_eq!(input.registry.modes.len(), 1);
    let matrix = input.demands.get("bus", "0").unwrap();
    assert_relative_eq!(matrix.get_by_ordinal(0, 1), 4.);
    assert_relative_eq!(matrix.get_by_ordinal(1, 0), 6.);
}

#[test]
fn test_bad_envs_fail() {
    let mut num_envs = 0;
    for path in glob("tests/envs/bad-*/config.yaml").expect("Failed to read glob pattern") {
        let path = path.unwrap();
        let result = PlanitInput::from_cfg(&path);
        assert!(result.is_err(), "{:?} should not have loaded", path);
        num_envs += 1;
    }
    assert_eq!(num_envs, 4);
}

#[test]
fn test_bad_env_causes() {
    match PlanitInput::from_cfg(&env_config("bad-ambiguous-userclass")) {
        Err(InputError::AmbiguousDefault {kind: "user class", candidates: 2, ..}) => {}
        other => panic!("unexpected result {:?}", other.map(|_| ())),
    }
    match PlanitInput::from_cfg(&env_config("bad-duplicate-timeperiod")) {
        Err(InputError::DuplicateId {kind: "time period", id}) => assert_eq!(id, "0"),
        other => panic!("unexpected result {:?}", other.map(|_| ())),
    }
    match PlanitInput::from_cfg(&env_config("bad-ragged-raw")) {
        Err(err @ InputError::MatrixShape { .. }) => {
            assert!(err.to_string().contains("row 3 has 2 values"), "{}", err);
        }
        other => panic!("unexpected result {:?}", other.map(|_| ())),
    }
    match PlanitInput::from_cfg(&env_config("bad-duplicate-matrix")) {
        Err(InputError::DuplicateId {kind: "demand matrix", ..}) => {}
        other => panic!("unexpected result {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_duplicate_matrix_warn_policy() {
    let mut cfg = InputConfig::from_yaml_path(&env_config("bad-duplicate-matrix")).unwrap();
    cfg.policies.demands = DuplicatePolicy::Warn;
    let input = PlanitInput::from_files(&cfg).unwrap();
    let matrix = input.demands.get(DEFAULT_MODE_ID, "0").unwrap();
    assert_eq!(matrix.as_array(), &ndarray::arr2(&[[0., 1., 2.], [3., 0., 4.], [0., 0., 0.]]));
}
