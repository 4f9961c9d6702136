use skymeter::image::{Image, Peak};
use skymeter::output::csv_string;
use skymeter::source::Source;
use skymeter::{astrometry, photometry};

fn measure_source(image: Image, peak: Peak, algorithms: &[&str]) -> Source {
    let mut astro = astrometry::measurer();
    astro.add_algorithm("naive").unwrap();

    let mut photo = photometry::measurer();
    for name in algorithms {
        photo.add_algorithm(name).unwrap();
    }

    let mut source = Source::new();
    source.set_astrometry(astro.measure(&peak).unwrap());
    source.set_photometry(photo.measure(&image).unwrap());
    source
}

#[test]
fn csv_contract_for_psf_only() {
    let sources = vec![
        measure_source(Image::new(1.0), Peak::new(20.0, 100.0), &["psf"]),
        measure_source(Image::new(10.0), Peak::new(15.0, 25.0), &["psf"]),
    ];

    let rendered = csv_string(&sources).unwrap();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[0],
        "naive.x, naive.xErr, naive.y, naive.yErr, psf.flux, psf.fluxErr"
    );
    assert_eq!(lines[1], "pixel, pixel, pixel, pixel, , ");
    assert_eq!(lines[2], "20, 0, 100, 0, 3, -1");
    assert_eq!(lines[3], "15, 0, 25, 0, 30, -1");
}

#[test]
fn csv_array_fields_repeat_per_index() {
    let sources = vec![measure_source(
        Image::new(10.0),
        Peak::new(20.0, 100.0),
        &["aper"],
    )];

    let rendered = csv_string(&sources).unwrap();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(
        lines[0],
        "naive.x, naive.xErr, naive.y, naive.yErr, \
         aper.flux0, aper.flux1, aper.flux2, \
         aper.fluxErr0, aper.fluxErr1, aper.fluxErr2, \
         aper.radius0, aper.radius1, aper.radius2"
    );
    assert_eq!(
        lines[1],
        "pixel, pixel, pixel, pixel, , , , , , , arcsec, arcsec, arcsec"
    );
    // Float fields render at f32 precision: 6.66, not 6.659999847412109.
    assert_eq!(
        lines[2],
        "20, 0, 100, 0, 10, 11, 12, -1, -1, -1, 6.66, 7.66, 8.66"
    );
}

#[test]
fn csv_mixed_algorithms_follow_activation_order() {
    let sources = vec![measure_source(
        Image::new(10.0),
        Peak::new(20.0, 100.0),
        &["psf", "model"],
    )];

    let rendered = csv_string(&sources).unwrap();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(
        lines[0],
        "naive.x, naive.xErr, naive.y, naive.yErr, \
         psf.flux, psf.fluxErr, model.flux, model.fluxErr, model.sersic_n"
    );
    assert_eq!(lines[2], "20, 0, 100, 0, 30, -1, 20, 0.2, 4");
}

#[test]
fn csv_is_empty_for_no_sources() {
    assert_eq!(csv_string(&[]).unwrap(), "");
}

#[test]
fn schema_table_lists_every_field() {
    let source = measure_source(Image::new(10.0), Peak::new(20.0, 100.0), &["psf", "aper"]);
    let table = source.schema_table().to_string();
    assert!(table.contains("naive.x"));
    assert!(table.contains("psf.flux"));
    assert!(table.contains("aper.radius"));
    assert!(table.contains("arcsec"));
    assert!(table.contains("6.66 7.66 8.66"));
}

#[test]
fn source_display_braces_both_composites() {
    let source = measure_source(Image::new(10.0), Peak::new(20.0, 100.0), &["psf"]);
    assert_eq!(source.to_string(), "{[(20+-0, 100+-0)]\t[30]}");
}
