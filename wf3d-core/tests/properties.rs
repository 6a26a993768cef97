use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::{Matrix4, Point2, Point3, RowVector4, Vector4};
use proptest::prelude::*;
use wf3d_core::matrix::{column, dot, multiply, to_dynamic};
use wf3d_core::{
    canvas_to_model, model_to_canvas, Control, Curve, Drawable, Hermite, RecordingSurface, Shape,
    Transform, Transformable, Viewport,
};

#[derive(Debug, Clone)]
enum Op {
    Translate(f64, f64, f64),
    RotateX(f64),
    RotateY(f64),
    RotateZ(f64),
    Scale(f64, f64, f64),
}

fn op() -> impl Strategy<Value = Op> {
    let v = -10.0..10.0f64;
    let angle = -PI..PI;
    prop_oneof![
        (v.clone(), v.clone(), v.clone()).prop_map(|(x, y, z)| Op::Translate(x, y, z)),
        angle.clone().prop_map(Op::RotateX),
        angle.clone().prop_map(Op::RotateY),
        angle.prop_map(Op::RotateZ),
        (v.clone(), v.clone(), v).prop_map(|(x, y, z)| Op::Scale(x, y, z)),
    ]
}

fn apply(t: &mut Transform, op: &Op) {
    match *op {
        Op::Translate(x, y, z) => t.translate(x, y, z),
        Op::RotateX(a) => t.rotate_x(a),
        Op::RotateY(a) => t.rotate_y(a),
        Op::RotateZ(a) => t.rotate_z(a),
        Op::Scale(x, y, z) => t.scale(x, y, z),
    };
}

proptest! {
    #[test]
    fn bottom_row_stays_affine(ops in prop::collection::vec(op(), 0..16)) {
        let mut t = Transform::identity();
        for op in &ops {
            apply(&mut t, op);
        }
        prop_assert_eq!(t.matrix().row(3).into_owned(), RowVector4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn identity_composition_is_neutral(ops in prop::collection::vec(op(), 1..8)) {
        let mut t = Transform::identity();
        for op in &ops {
            apply(&mut t, op);
        }
        let composed = Matrix4::identity() * t.matrix();
        let mut after = t;
        after.compose(&Matrix4::identity());
        prop_assert!((composed - t.matrix()).norm() < 1e-9);
        prop_assert!((after.matrix() - t.matrix()).norm() < 1e-9);
    }

    #[test]
    fn rotate_x_inverse(theta in -10.0..10.0f64) {
        let mut t = Transform::identity();
        t.rotate_x(theta).rotate_x(-theta);
        prop_assert!((t.matrix() - Matrix4::identity()).norm() < 1e-9);
    }

    #[test]
    fn canvas_round_trip(
        x in -1.0..=1.0f64,
        y in -1.0..=1.0f64,
        width in 1.0..4000.0f64,
        height in 1.0..4000.0f64,
    ) {
        let p = Point2::new(x, y);
        let back = canvas_to_model(model_to_canvas(p, width, height), width, height);
        prop_assert!((back - p).norm() < 1e-9);
    }

    #[test]
    fn hermite_hits_endpoints(
        coords in prop::array::uniform8(-1.0..1.0f64),
        res in 2usize..200,
    ) {
        let mut start = Control::new(coords[0], coords[1]);
        start.update_tangent(coords[2], coords[3]);
        let mut end = Control::new(coords[4], coords[5]);
        end.update_tangent(coords[6], coords[7]);

        let curve = Hermite::new(&start, &end).unwrap();
        let samples: Vec<_> = curve.samples(res).unwrap().collect();
        prop_assert_eq!(samples.len(), res);
        prop_assert_eq!(samples[0], start.position.position);
        prop_assert_eq!(samples[res - 1], end.position.position);
    }

    #[test]
    fn multiply_matches_row_dots(
        entries in prop::array::uniform16(-100.0..100.0f64),
        point in prop::array::uniform3(-100.0..100.0f64),
    ) {
        let m = Matrix4::from_row_slice(&entries);
        let v = Vector4::new(point[0], point[1], point[2], 1.0);
        let product = multiply(&to_dynamic(&m), &column(&v)).unwrap();
        for r in 0..4 {
            let row = [m[(r, 0)], m[(r, 1)], m[(r, 2)], m[(r, 3)]];
            prop_assert_eq!(product[(r, 0)], dot(&row, v.as_slice()).unwrap());
        }

        let transformed = Transform::from_matrix(m)
            .transform_point(&Point3::new(point[0], point[1], point[2]))
            .unwrap();
        for r in 0..4 {
            prop_assert_eq!(transformed[r], product[(r, 0)]);
        }
    }
}

#[test]
fn cube_at_800_draws_twelve_edges_on_canvas() {
    let mut cube = Shape::cube();
    let mut surface = RecordingSurface::new();
    cube.draw(&mut surface, &Viewport::new(800.0, 800.0)).unwrap();

    assert_eq!(surface.line_count(), 12);
    assert!(surface
        .points()
        .all(|(x, y)| (0.0..=800.0).contains(&x) && (0.0..=800.0).contains(&y)));
}

#[test]
fn composition_order_is_not_commutative() {
    let vertex = Point3::new(1.0, 0.0, 0.0);

    let mut translate_first = Transform::identity();
    translate_first.translate(1.0, 0.0, 0.0).rotate_z(FRAC_PI_2);

    let mut rotate_first = Transform::identity();
    rotate_first.rotate_z(FRAC_PI_2).translate(1.0, 0.0, 0.0);

    let a = translate_first.transform_point(&vertex).unwrap();
    let b = rotate_first.transform_point(&vertex).unwrap();
    assert!((a - b).norm() > 1.0);
}

#[test]
fn shape_trait_methods_chain() {
    let mut shape = Shape::cube();
    shape.translate(0.1, 0.0, 0.0).rotate_x(0.3).rotate_y(0.2).scale(0.5, 0.5, 0.5);
    let mut surface = RecordingSurface::new();
    shape.draw(&mut surface, &Viewport::default()).unwrap();
    assert_eq!(shape.transformed_vertices().len(), 8);
    assert_eq!(surface.line_count(), 12);
}
