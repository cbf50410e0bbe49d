//! End-to-end generation into a temporary output root

use std::fs;
use std::path::Path;

use benchmark::{
    find_cases, generate_fits_file, GalSimTestCase, GenerateConfig, GenerateError,
    TestCaseDefinition, ValidationError,
};
use fitsio::compat::fitsfile::FitsFile;
use fitsio::compat::hdu::FitsHdu;
use tempfile::TempDir;

/// Size of a FITS logical record
const FITS_BLOCK_SIZE: usize = 2880;

fn config_in(root: &Path) -> GenerateConfig {
    GenerateConfig {
        output_root: root.to_path_buf(),
        base_seed: 1234,
        show_progress: false,
    }
}

/// Image extensions of a file keyed by EXTNAME, in file order
fn named_hdus(fptr: &FitsFile) -> Vec<(String, FitsHdu)> {
    let mut hdus = Vec::new();
    let mut hdu_idx = 0;
    while let Ok(hdu) = fptr.hdu(hdu_idx) {
        if let Ok(name) = hdu.read_key::<String>(fptr, "EXTNAME") {
            hdus.push((name, hdu));
        }
        hdu_idx += 1;
    }
    hdus
}

#[test]
fn test_generates_checksummed_file_and_pointer() {
    let _ = env_logger::builder().is_test(true).try_init();
    let temp_dir = TempDir::new().unwrap();
    let cases = find_cases(&["simple_star".to_string(), "simple_galaxy".to_string()]).unwrap();

    let generated = generate_fits_file("unit", &cases, &config_in(temp_dir.path())).unwrap();
    assert_eq!(generated.hdu_count, 10);

    // output/unit_{10 hex digits}.fits
    let name = generated.file_name().unwrap().to_string();
    assert!(name.starts_with("unit_") && name.ends_with(".fits"), "{name}");
    let digest = &name["unit_".len()..name.len() - ".fits".len()];
    assert_eq!(digest.len(), 10);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(
        generated.fits_path,
        temp_dir.path().join("output").join(&name)
    );
    assert!(!temp_dir.path().join("output").join("unit.fits").exists());

    let pointer_path = temp_dir.path().join("latest_filenames/latest_unit.txt");
    assert_eq!(generated.latest_pointer, pointer_path);
    assert_eq!(fs::read_to_string(pointer_path).unwrap(), format!("{name}\n"));

    let bytes = fs::read(&generated.fits_path).unwrap();
    assert_eq!(bytes.len() % FITS_BLOCK_SIZE, 0);
    assert!(bytes.windows(10).any(|window| window == b"/ Celeste:"));

    let fptr = FitsFile::open(&generated.fits_path).unwrap();
    let hdus = named_hdus(&fptr);
    assert_eq!(hdus.len(), 10);
    assert_eq!(hdus[0].0, "simple_star_1");
    assert_eq!(hdus[9].0, "simple_galaxy_5");

    let (_, galaxy_band_1) = &hdus[5];
    assert_eq!(
        galaxy_band_1.read_key::<String>(&fptr, "CLTYP001").unwrap(),
        "galaxy"
    );
    assert_eq!(galaxy_band_1.read_key::<i64>(&fptr, "CLBAND").unwrap(), 1);
    assert_eq!(galaxy_band_1.read_key::<i64>(&fptr, "CLCASEI").unwrap(), 2);
    assert_eq!(galaxy_band_1.read_key::<String>(&fptr, "CTYPE1").unwrap(), "LINEAR");
}

#[test]
fn test_rerun_replaces_output_with_identical_file() {
    let temp_dir = TempDir::new().unwrap();
    let cases = find_cases(&["star_and_galaxy".to_string()]).unwrap();
    let config = config_in(temp_dir.path());

    let first = generate_fits_file("repeat", &cases, &config).unwrap();
    let first_bytes = fs::read(&first.fits_path).unwrap();

    // A stale unrenamed output from an interrupted run is removed first
    fs::write(temp_dir.path().join("output/repeat.fits"), b"stale").unwrap();
    let second = generate_fits_file("repeat", &cases, &config).unwrap();

    assert_eq!(first.fits_path, second.fits_path);
    assert_eq!(first_bytes, fs::read(&second.fits_path).unwrap());
    assert!(!temp_dir.path().join("output/repeat.fits").exists());
}

#[test]
fn test_seed_changes_file_name() {
    let temp_dir = TempDir::new().unwrap();
    let cases = find_cases(&["noisy_star_and_galaxy".to_string()]).unwrap();

    let first = generate_fits_file("seeded", &cases, &config_in(temp_dir.path())).unwrap();
    let other_config = GenerateConfig {
        base_seed: 4321,
        ..config_in(temp_dir.path())
    };
    let second = generate_fits_file("seeded", &cases, &other_config).unwrap();

    assert_ne!(first.fits_path, second.fits_path);
    let pointer =
        fs::read_to_string(temp_dir.path().join("latest_filenames/latest_seeded.txt")).unwrap();
    assert_eq!(pointer, format!("{}\n", second.file_name().unwrap()));
}

fn one_star(test_case: &mut GalSimTestCase) -> Result<(), ValidationError> {
    test_case.add_star();
    Ok(())
}

fn too_many_sources(test_case: &mut GalSimTestCase) -> Result<(), ValidationError> {
    for _ in 0..1000 {
        test_case.add_star();
    }
    Ok(())
}

#[test]
fn test_failing_case_aborts_batch_without_output() {
    let temp_dir = TempDir::new().unwrap();
    let good = TestCaseDefinition {
        name: "one_star",
        configure: one_star,
    };
    let crowded = TestCaseDefinition {
        name: "too_many_sources",
        configure: too_many_sources,
    };

    let result = generate_fits_file("aborted", &[&good, &crowded], &config_in(temp_dir.path()));
    match result {
        Err(GenerateError::Configuration { case, .. }) => assert_eq!(case, "too_many_sources"),
        other => panic!("expected a configuration error, got {other:?}"),
    }

    let output_dir = temp_dir.path().join("output");
    let fits_files = fs::read_dir(&output_dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "fits"))
                .count()
        })
        .unwrap_or(0);
    assert_eq!(fits_files, 0);
    assert!(!temp_dir.path().join("latest_filenames").exists());
}

#[test]
fn test_unknown_case_name_rejected() {
    assert!(matches!(
        find_cases(&["simple_star".to_string(), "bogus".to_string()]),
        Err(GenerateError::UnknownCase(_))
    ));
}
