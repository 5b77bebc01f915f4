// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_relative_eq;
use printforge_core::{Axis, Extent3};
use printforge_geometry::{
    place, CsgCombinator, CsgOp, CsgrsKernel, Error, GeometryKernel, PrimitiveFactory, Point3,
    Transform,
};

#[test]
fn test_identity_place_preserves_volume_and_bounds() {
    let kernel = CsgrsKernel::default();
    let factory = PrimitiveFactory::new(&kernel);

    let instances = vec![
        factory.make_box("box", Extent3::new(40.0, 30.0, 25.0)).unwrap(),
        factory.make_cylinder("pin", 0.75, 4.0, Axis::X).unwrap(),
        factory
            .make_hull(
                "ramp",
                &[
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(3.0, 0.0, 0.0),
                    Point3::new(0.0, 4.0, 0.0),
                    Point3::new(3.0, 4.0, 0.0),
                    Point3::new(0.0, 4.0, 4.0),
                    Point3::new(3.0, 4.0, 4.0),
                ],
            )
            .unwrap(),
    ];

    for instance in &instances {
        let placed = place(&kernel, instance, &Transform::identity());
        assert_relative_eq!(
            kernel.volume(placed.world()),
            kernel.volume(instance.world()),
            epsilon = 1e-12
        );
        let (a, b) = (placed.bounds(), instance.bounds());
        assert_relative_eq!(a.min, b.min, epsilon = 1e-12);
        assert_relative_eq!(a.max, b.max, epsilon = 1e-12);
        assert_eq!(placed.name(), instance.name());
    }
}

#[test]
fn test_place_composes_with_prior_placement() {
    let kernel = CsgrsKernel::default();
    let factory = PrimitiveFactory::new(&kernel);

    let block = factory.make_box("block", Extent3::new(2.0, 4.0, 6.0)).unwrap();
    let a = Transform::rotation(Axis::Z, 90.0);
    let b = Transform::translation(10.0, 0.0, 0.0);

    let twice = factory.place(&factory.place(&block, &a), &b);
    let once = factory.place(&block, &(b * a));

    assert_relative_eq!(twice.bounds().min, once.bounds().min, epsilon = 1e-9);
    assert_relative_eq!(twice.bounds().max, once.bounds().max, epsilon = 1e-9);
    // Rotated: the 4mm side now runs along X
    assert_relative_eq!(twice.bounds().extent(Axis::X), 4.0, epsilon = 1e-9);
    assert_relative_eq!(twice.bounds().center().x, 10.0, epsilon = 1e-9);

    // The original is untouched
    assert_relative_eq!(block.bounds().extent(Axis::X), 2.0, epsilon = 1e-12);
}

#[test]
fn test_degenerate_hulls() {
    let kernel = CsgrsKernel::default();
    let factory = PrimitiveFactory::new(&kernel);

    let three = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ];
    assert!(matches!(
        factory.make_hull("tri", &three),
        Err(Error::DegenerateHull(_))
    ));

    let flat: Vec<_> = (0..10)
        .map(|i| {
            let t = i as f64;
            Point3::new(t.cos(), t.sin(), 2.0)
        })
        .collect();
    assert!(matches!(
        factory.make_hull("disc", &flat),
        Err(Error::DegenerateHull(_))
    ));
}

#[test]
fn test_ammo_can_style_body() {
    let kernel = CsgrsKernel::default();
    let factory = PrimitiveFactory::new(&kernel);
    let combinator = CsgCombinator::new(&kernel);

    let shell = factory.place(
        &factory.make_box("shell", Extent3::new(40.0, 30.0, 25.0)).unwrap(),
        &Transform::translation(0.0, 0.0, 12.5),
    );
    // Cavity overshoots the open top by 1mm
    let cavity = factory.place(
        &factory.make_box("cavity", Extent3::new(36.0, 26.0, 24.0)).unwrap(),
        &Transform::translation(0.0, 0.0, 14.0),
    );

    let part = combinator
        .combine("base", CsgOp::Difference, &[shell, cavity])
        .unwrap();
    let expected = 40.0 * 30.0 * 25.0 - 36.0 * 26.0 * 23.0;
    assert_relative_eq!(part.volume(), expected, max_relative = 1e-9);
    assert_eq!(kernel.is_watertight(part.solid()), Some(true));
}
