use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// One fiducial observation from the current camera frame.
///
/// Produced fresh every frame by the vision pipeline; this crate never
/// mutates or retains it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "DetectionRepr", into = "DetectionRepr")]
pub struct Detection {
    /// Fiducial id decoded from the tag.
    pub id: i32,
    /// Pose ambiguity reported by the estimator (lower = more confident).
    pub ambiguity: f64,
    /// Best camera-to-target transform.
    pub camera_to_target: Isometry3<f64>,
    /// Target yaw as reported by the camera pipeline, in degrees
    /// (positive = clockwise, seen from above).
    pub yaw_deg: f64,
}

impl Detection {
    /// Detection with an identity camera-to-target rotation.
    pub fn new(id: i32, ambiguity: f64, translation: Vector3<f64>, yaw_deg: f64) -> Self {
        Self {
            id,
            ambiguity,
            camera_to_target: Isometry3::from_parts(
                Translation3::from(translation),
                UnitQuaternion::identity(),
            ),
            yaw_deg,
        }
    }

    pub fn with_rotation(mut self, rotation: UnitQuaternion<f64>) -> Self {
        self.camera_to_target.rotation = rotation;
        self
    }

    /// Camera-to-target translation projected onto the floor plane.
    #[inline]
    pub fn planar_translation(&self) -> Vector2<f64> {
        self.camera_to_target.translation.vector.xy()
    }

    /// True when every component the resolver consumes is finite.
    pub fn is_finite(&self) -> bool {
        self.planar_translation().iter().all(|v| v.is_finite()) && self.yaw_deg.is_finite()
    }
}

/// Everything the camera reported for one tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Detections in the order the pipeline listed them.
    #[serde(default)]
    pub targets: Vec<Detection>,
    /// The pipeline's own lowest-ambiguity pick, if it made one.
    #[serde(default)]
    pub best: Option<Detection>,
}

impl Frame {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Frame without a pipeline `best`, the same as a JSON frame that omits
    /// it. Selection then falls back to the lowest ambiguity.
    pub fn from_targets(targets: Vec<Detection>) -> Self {
        Self {
            targets,
            best: None,
        }
    }

    pub fn has_targets(&self) -> bool {
        !self.targets.is_empty()
    }
}

/// Wire form: translation in metres and rotation as roll/pitch/yaw degrees,
/// which is what hand-written replay files use.
#[derive(Clone, Copy, Serialize, Deserialize)]
struct DetectionRepr {
    id: i32,
    #[serde(default)]
    ambiguity: f64,
    translation: [f64; 3],
    #[serde(default)]
    rotation_rpy_deg: [f64; 3],
    #[serde(default)]
    yaw_deg: f64,
}

impl From<DetectionRepr> for Detection {
    fn from(r: DetectionRepr) -> Self {
        let [roll, pitch, yaw] = r.rotation_rpy_deg.map(f64::to_radians);
        Detection::new(r.id, r.ambiguity, Vector3::from(r.translation), r.yaw_deg)
            .with_rotation(UnitQuaternion::from_euler_angles(roll, pitch, yaw))
    }
}

impl From<Detection> for DetectionRepr {
    fn from(d: Detection) -> Self {
        let (roll, pitch, yaw) = d.camera_to_target.rotation.euler_angles();
        let t = d.camera_to_target.translation.vector;
        DetectionRepr {
            id: d.id,
            ambiguity: d.ambiguity,
            translation: [t.x, t.y, t.z],
            rotation_rpy_deg: [roll.to_degrees(), pitch.to_degrees(), yaw.to_degrees()],
            yaw_deg: d.yaw_deg,
        }
    }
}
