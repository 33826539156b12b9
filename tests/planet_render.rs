use planetgen::math3d::Vec3;
use planetgen::{Camera, PixelBuffer, Planet, SphereProjector, TraitEdit, Traits};

fn render_frame(traits: Traits, camera: &Camera) -> PixelBuffer {
    let mut planet = Planet::new(traits);
    let mut buffer = PixelBuffer::with_size(1, 1);
    planet.render(camera, &mut buffer);
    buffer
}

#[test]
fn center_pixel_shows_band_under_view_axis() {
    let traits = Traits::default();
    let planet = Planet::new(traits);
    let camera = Camera::new(150, 150);
    let mut terrain_layer = PixelBuffer::with_size(150, 150);
    SphereProjector::render(&camera, &planet.terrain_model(), traits.size, &mut terrain_layer);

    let model = planet.terrain_model();
    let height = model.height_at(Vec3::new(0.0, 0.0, traits.size));
    let expected = planet
        .terrains()
        .at_height(height)
        .expect("default bands cover every height")
        .color;

    assert_eq!(
        terrain_layer.get_pixel_rgba(75, 75),
        Some((expected.r, expected.g, expected.b, 255))
    );
    assert_eq!(terrain_layer.get_pixel_rgba(0, 0), Some((0, 0, 0, 0)));
}

#[test]
fn full_frame_is_deterministic() {
    let camera = Camera::new(150, 150).with_rotation(0.3, 1.1, 0.0);
    let a = render_frame(Traits::default(), &camera);
    let b = render_frame(Traits::default(), &camera);
    assert_eq!(a.width(), 150);
    assert_eq!(a.height(), 150);
    assert_eq!(a, b);
}

#[test]
fn bare_planet_frame_matches_terrain_layer() {
    let traits = Traits::default()
        .apply(TraitEdit::AtmoDensity(0.0))
        .and_then(|t| t.apply(TraitEdit::CloudDensity(0.0)))
        .unwrap();
    let camera = Camera::new(96, 96).with_rotation(-0.2, 2.0, 0.0);
    let frame = render_frame(traits, &camera);

    let planet = Planet::new(traits);
    assert!(planet.clouds().is_empty());
    let mut terrain_layer = PixelBuffer::with_size(96, 96);
    SphereProjector::render(&camera, &planet.terrain_model(), traits.size, &mut terrain_layer);

    assert_eq!(frame, terrain_layer);
}

#[test]
fn halo_brightens_the_rim() {
    let camera = Camera::new(150, 150);
    let clear = Traits::default().apply(TraitEdit::CloudDensity(0.0)).unwrap();
    let with_halo = render_frame(clear, &camera);
    let bare = render_frame(clear.apply(TraitEdit::AtmoDensity(0.0)).unwrap(), &camera);
    assert!(with_halo.coverage() > bare.coverage());
}

#[test]
fn seed_change_changes_frame() {
    let camera = Camera::new(80, 80);
    let a = render_frame(Traits::default(), &camera);
    let b = render_frame(Traits::default().apply(TraitEdit::Seed(7)).unwrap(), &camera);
    assert_ne!(a, b);
}
