//! Catalog of ground-truth test cases
//!
//! Each entry pairs a stable name (used for HDU names and `--case` selection)
//! with a function that configures a default [`GalSimTestCase`]. Catalog order
//! fixes each case's index, and with it the case's random seed.

use crate::error::{GenerateError, ValidationError};
use crate::scene::GalSimTestCase;

pub type ConfigureFn = fn(&mut GalSimTestCase) -> Result<(), ValidationError>;

#[derive(Debug, Clone, Copy)]
pub struct TestCaseDefinition {
    pub name: &'static str,
    pub configure: ConfigureFn,
}

impl TestCaseDefinition {
    /// Build a fresh test case configured by this definition
    pub fn build(&self) -> Result<GalSimTestCase, ValidationError> {
        let mut test_case = GalSimTestCase::new();
        (self.configure)(&mut test_case)?;
        Ok(test_case)
    }
}

macro_rules! case {
    ($name:ident) => {
        TestCaseDefinition {
            name: stringify!($name),
            configure: $name,
        }
    };
}

pub const TEST_CASES: &[TestCaseDefinition] = &[
    case!(simple_star),
    case!(star_position_1),
    case!(star_position_2),
    case!(dim_star),
    case!(bright_star),
    case!(star_color),
    case!(simple_galaxy),
    case!(galaxy_angle_1),
    case!(galaxy_angle_2),
    case!(galaxy_minor_major_ratio),
    case!(galaxy_half_light_radius),
    case!(galaxy_de_vaucouleurs),
    case!(galaxy_color),
    case!(star_and_galaxy),
    case!(three_sources_two_overlap),
    case!(noisy_star_and_galaxy),
    case!(shifted_world_origin),
    case!(rectangular_image),
];

/// Look up cases by name, in the order given; an empty list selects the whole catalog
pub fn find_cases(names: &[String]) -> Result<Vec<&'static TestCaseDefinition>, GenerateError> {
    if names.is_empty() {
        return Ok(TEST_CASES.iter().collect());
    }
    names
        .iter()
        .map(|name| {
            TEST_CASES
                .iter()
                .find(|case| case.name == name.as_str())
                .ok_or_else(|| GenerateError::UnknownCase(name.clone()))
        })
        .collect()
}

fn simple_star(test_case: &mut GalSimTestCase) -> Result<(), ValidationError> {
    test_case.add_star();
    test_case.set_comment("one centered star");
    Ok(())
}

fn star_position_1(test_case: &mut GalSimTestCase) -> Result<(), ValidationError> {
    test_case.add_star().offset_arcsec(-2.0, 3.0);
    test_case.set_comment("star off center");
    Ok(())
}

fn star_position_2(test_case: &mut GalSimTestCase) -> Result<(), ValidationError> {
    test_case.add_star().world_coordinates_deg(0.004, 0.0065);
    test_case.set_comment("star at absolute world coordinates");
    Ok(())
}

fn dim_star(test_case: &mut GalSimTestCase) -> Result<(), ValidationError> {
    test_case.add_star().reference_band_flux_nmgy(4.0)?;
    test_case.set_comment("dim star");
    Ok(())
}

fn bright_star(test_case: &mut GalSimTestCase) -> Result<(), ValidationError> {
    test_case.add_star().reference_band_flux_nmgy(400.0)?;
    test_case.set_comment("bright star");
    Ok(())
}

fn star_color(test_case: &mut GalSimTestCase) -> Result<(), ValidationError> {
    test_case
        .add_star()
        .flux_relative_to_reference_band(&[0.3, 0.8, 1.0, 0.9, 0.6])?;
    test_case.set_comment("star with a non-default color");
    Ok(())
}

fn simple_galaxy(test_case: &mut GalSimTestCase) -> Result<(), ValidationError> {
    test_case.add_galaxy();
    test_case.set_comment("one centered galaxy");
    Ok(())
}

fn galaxy_angle_1(test_case: &mut GalSimTestCase) -> Result<(), ValidationError> {
    test_case.add_galaxy().angle_deg(15.0);
    test_case.set_comment("rotated galaxy");
    Ok(())
}

fn galaxy_angle_2(test_case: &mut GalSimTestCase) -> Result<(), ValidationError> {
    test_case.add_galaxy().angle_deg(160.0);
    test_case.set_comment("galaxy rotated past 90 degrees");
    Ok(())
}

fn galaxy_minor_major_ratio(test_case: &mut GalSimTestCase) -> Result<(), ValidationError> {
    test_case.add_galaxy().minor_major_axis_ratio(0.2)?;
    test_case.set_comment("very elongated galaxy");
    Ok(())
}

fn galaxy_half_light_radius(test_case: &mut GalSimTestCase) -> Result<(), ValidationError> {
    test_case.add_galaxy().half_light_radius_arcsec(3.0)?;
    test_case.set_comment("larger galaxy");
    Ok(())
}

fn galaxy_de_vaucouleurs(test_case: &mut GalSimTestCase) -> Result<(), ValidationError> {
    test_case.add_galaxy().de_vaucouleurs_mixture_weight(0.8)?;
    test_case.set_comment("bulge-dominated galaxy");
    Ok(())
}

fn galaxy_color(test_case: &mut GalSimTestCase) -> Result<(), ValidationError> {
    test_case
        .add_galaxy()
        .flux_relative_to_reference_band(&[0.2, 0.6, 1.0, 1.6, 2.2])?;
    test_case.set_comment("red galaxy");
    Ok(())
}

fn star_and_galaxy(test_case: &mut GalSimTestCase) -> Result<(), ValidationError> {
    test_case.add_star().offset_arcsec(-6.0, 0.0);
    test_case
        .add_galaxy()
        .offset_arcsec(6.0, 2.0)
        .angle_deg(30.0)
        .reference_band_flux_nmgy(20.0)?;
    test_case.set_comment("separated star and galaxy");
    Ok(())
}

fn three_sources_two_overlap(test_case: &mut GalSimTestCase) -> Result<(), ValidationError> {
    test_case.add_star().offset_arcsec(-5.0, 5.0);
    test_case
        .add_galaxy()
        .offset_arcsec(-4.0, 4.0)
        .minor_major_axis_ratio(0.6)?;
    test_case
        .add_star()
        .offset_arcsec(8.0, -8.0)
        .reference_band_flux_nmgy(10.0)?;
    test_case.set_comment("overlapping star and galaxy plus a separate star");
    Ok(())
}

fn noisy_star_and_galaxy(test_case: &mut GalSimTestCase) -> Result<(), ValidationError> {
    star_and_galaxy(test_case)?;
    test_case.set_include_noise(true);
    test_case.set_comment("separated star and galaxy with Poisson sky noise");
    Ok(())
}

fn shifted_world_origin(test_case: &mut GalSimTestCase) -> Result<(), ValidationError> {
    test_case.set_world_origin(90.0, -36.0);
    test_case.add_star().offset_arcsec(2.0, -1.0);
    test_case.add_galaxy().offset_arcsec(-7.0, 4.0);
    test_case.set_comment("image origin away from (0, 0)");
    Ok(())
}

fn rectangular_image(test_case: &mut GalSimTestCase) -> Result<(), ValidationError> {
    test_case.set_dimensions(128, 64);
    test_case.set_resolution(0.5);
    test_case.set_psf_sigma_pixels(3.0);
    test_case.add_galaxy().offset_arcsec(12.0, 0.0).angle_deg(80.0);
    test_case.add_star().offset_arcsec(-12.0, 0.0);
    test_case.set_comment("wide image at coarser resolution");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_case_builds() {
        for definition in TEST_CASES {
            let test_case = definition
                .build()
                .unwrap_or_else(|e| panic!("{} failed to build: {e}", definition.name));
            assert!(
                !test_case.light_sources().is_empty(),
                "{} has no sources",
                definition.name
            );
            assert!(test_case.comment.is_some(), "{} has no comment", definition.name);
        }
    }

    #[test]
    fn test_names_unique_and_short() {
        let names: HashSet<_> = TEST_CASES.iter().map(|c| c.name).collect();
        assert_eq!(names.len(), TEST_CASES.len());
        // HDU names are "{name}_{band}"; FITS string values hold 68 characters
        assert!(TEST_CASES.iter().all(|c| c.name.len() + 2 <= 68));
    }

    #[test]
    fn test_find_cases() {
        assert_eq!(find_cases(&[]).unwrap().len(), TEST_CASES.len());

        let selected =
            find_cases(&["simple_galaxy".to_string(), "simple_star".to_string()]).unwrap();
        let names: Vec<_> = selected.iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["simple_galaxy", "simple_star"]);

        assert!(matches!(
            find_cases(&["no_such_case".to_string()]),
            Err(GenerateError::UnknownCase(name)) if name == "no_such_case"
        ));
    }

    #[test]
    fn test_noisy_case_reuses_scene() {
        let quiet = TEST_CASES[13].build().unwrap();
        let noisy = TEST_CASES[15].build().unwrap();
        assert_eq!(quiet.light_sources(), noisy.light_sources());
        assert!(noisy.include_noise);
    }
}
