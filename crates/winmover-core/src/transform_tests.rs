use std::sync::Arc;

use super::*;
use crate::fakes::{FakeState, FakeWindowOps};

const WORK_AREA: Rect = Rect {
    x: 1920,
    y: 0,
    width: 2560,
    height: 1400,
};

fn setup(ops: FakeWindowOps) -> (Arc<FakeWindowOps>, WindowTransformer) {
    ops.add(7, Rect::new(100, 100, 640, 480), 99);
    let ops = Arc::new(ops);
    let transformer = WindowTransformer::new(ops.clone());
    (ops, transformer)
}

fn request(mode: ResizeMode) -> TransformRequest {
    TransformRequest {
        destination_point: (10, 20),
        resize_mode: mode,
        make_topmost: false,
    }
}

#[test]
fn no_resize_moves_relative_to_work_area_and_keeps_size() {
    // Arrange
    let (ops, transformer) = setup(FakeWindowOps::default());

    // Act
    transformer
        .apply(WindowHandle(7), WORK_AREA, &request(ResizeMode::NoResize))
        .unwrap();

    // Assert
    let window = ops.window(7);
    assert_eq!(window.normal, Rect::new(1930, 20, 640, 480));
    assert_eq!(window.state, FakeState::Normal);
}

#[test]
fn extreme_offset_is_clamped_to_screen_coordinates() {
    // Arrange
    let (ops, transformer) = setup(FakeWindowOps::default());
    let req = TransformRequest {
        destination_point: (i32::MAX, 0),
        resize_mode: ResizeMode::NoResize,
        make_topmost: false,
    };

    // Act
    let result = transformer.apply(WindowHandle(7), WORK_AREA, &req);

    // Assert
    assert!(result.is_ok());
    assert_eq!(ops.window(7).normal, Rect::new(i32::MAX, 0, 640, 480));
}

#[test]
fn resize_to_sets_width_and_height() {
    // Arrange
    let (ops, transformer) = setup(FakeWindowOps::default());
    let req = TransformRequest {
        destination_point: (0, 0),
        resize_mode: ResizeMode::ResizeTo {
            height: 900,
            width: 1500,
        },
        make_topmost: false,
    };

    // Act
    transformer.apply(WindowHandle(7), WORK_AREA, &req).unwrap();

    // Assert
    assert_eq!(ops.window(7).normal, Rect::new(1920, 0, 1500, 900));
}

#[test]
fn maximize_restores_first_then_maximizes() {
    // Arrange
    let (ops, transformer) = setup(FakeWindowOps::default());

    // Act
    transformer
        .apply(WindowHandle(7), WORK_AREA, &request(ResizeMode::Maximize))
        .unwrap();

    // Assert
    let calls = ops.calls();
    let normal = calls.iter().position(|c| c == "show 0x7 Normal").unwrap();
    let maximize = calls.iter().position(|c| c == "show 0x7 Maximize").unwrap();
    assert!(normal < maximize);
    assert_eq!(ops.window(7).state, FakeState::Maximized);
}

#[test]
fn repeated_maximize_is_idempotent() {
    // Arrange
    let (ops, transformer) = setup(FakeWindowOps::new(WORK_AREA));
    let req = request(ResizeMode::Maximize);

    // Act
    transformer.apply(WindowHandle(7), WORK_AREA, &req).unwrap();
    let first = ops.rect(WindowHandle(7)).unwrap();
    transformer.apply(WindowHandle(7), WORK_AREA, &req).unwrap();
    let second = ops.rect(WindowHandle(7)).unwrap();

    // Assert
    assert_eq!(first, WORK_AREA);
    assert_eq!(first, second);
}

#[test]
fn minimize_skips_restore() {
    let (ops, transformer) = setup(FakeWindowOps::default());

    transformer
        .apply(WindowHandle(7), WORK_AREA, &request(ResizeMode::Minimize))
        .unwrap();

    assert!(!ops.calls().iter().any(|c| c == "show 0x7 Normal"));
    assert_eq!(ops.window(7).state, FakeState::Minimized);
}

#[test]
fn only_topmost_leaves_geometry_alone() {
    // Arrange
    let (ops, transformer) = setup(FakeWindowOps::default());

    // Act
    transformer
        .apply(WindowHandle(7), WORK_AREA, &request(ResizeMode::OnlyTopmost))
        .unwrap();

    // Assert
    assert!(!ops.calls().iter().any(|c| c.starts_with("set_position")));
    assert!(!ops.calls().iter().any(|c| c.starts_with("show")));
    assert_eq!(ops.window(7).normal, Rect::new(100, 100, 640, 480));
}

#[test]
fn invalid_handle_reports_failure_without_panicking() {
    let (_, transformer) = setup(FakeWindowOps::default());

    let result = transformer.apply(WindowHandle(8), WORK_AREA, &request(ResizeMode::NoResize));

    assert!(result.is_err());
}

// -- forced foreground --

#[test]
fn forced_foreground_attaches_and_detaches_input() {
    // Arrange
    let (ops, transformer) = setup(FakeWindowOps::default());
    ops.add(50, Rect::new(0, 0, 100, 100), 77);
    *ops.foreground.lock().unwrap() = Some(WindowHandle(50));

    // Act
    transformer.force_foreground(WindowHandle(7));

    // Assert
    let calls = ops.calls();
    let attach = calls.iter().position(|c| c == "attach_input 77->1 true").unwrap();
    let top = calls.iter().position(|c| c == "bring_to_top 0x7").unwrap();
    let detach = calls.iter().position(|c| c == "attach_input 77->1 false").unwrap();
    assert!(attach < top && top < detach);
    assert_eq!(ops.foreground_window(), Some(WindowHandle(7)));
}

#[test]
fn forced_foreground_on_focused_window_skips_escalation() {
    let (ops, transformer) = setup(FakeWindowOps::default());
    *ops.foreground.lock().unwrap() = Some(WindowHandle(7));

    transformer.force_foreground(WindowHandle(7));

    assert!(!ops.calls().iter().any(|c| c.starts_with("attach_input")));
    assert!(ops.calls().iter().any(|c| c == "set_foreground 0x7"));
}

#[test]
fn forced_foreground_restores_minimized_window() {
    // Arrange
    let (ops, transformer) = setup(FakeWindowOps::default());
    ops.add(50, Rect::new(0, 0, 100, 100), 77);
    *ops.foreground.lock().unwrap() = Some(WindowHandle(50));
    ops.show(WindowHandle(7), ShowCommand::Minimize).unwrap();

    // Act
    transformer.force_foreground(WindowHandle(7));

    // Assert
    assert_eq!(ops.window(7).state, FakeState::Normal);
}

#[test]
fn denied_focus_never_fails_the_transform() {
    // Arrange
    let ops = FakeWindowOps {
        deny_focus: true,
        ..Default::default()
    };
    let (ops, transformer) = setup(ops);
    ops.add(50, Rect::new(0, 0, 100, 100), 77);
    *ops.foreground.lock().unwrap() = Some(WindowHandle(50));
    let req = TransformRequest {
        make_topmost: true,
        ..request(ResizeMode::NoResize)
    };

    // Act
    let result = transformer.apply(WindowHandle(7), WORK_AREA, &req);

    // Assert
    assert!(result.is_ok());
    assert_eq!(ops.foreground_window(), Some(WindowHandle(50)));
}
