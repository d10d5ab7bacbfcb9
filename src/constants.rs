// Scene tuning. All motion constants are per tick, not per second.

// ===== CLOCK =====

pub const CLOCK_STEP_PER_TICK: f32 = 0.01;     // Scene time advanced by each frame tick

// ===== PALETTE =====

pub const COLOR_DEEP_PINK: u32 = 0xff1493;
pub const COLOR_HOT_PINK: u32 = 0xff69b4;
pub const COLOR_PINK: u32 = 0xffc0cb;
pub const COLOR_RUBY: u32 = 0xff0066;
pub const COLOR_LIGHT_PINK: u32 = 0xffb6c1;
pub const COLOR_GOLD: u32 = 0xffd700;
pub const COLOR_ORANGE_RED: u32 = 0xff4500;
pub const COLOR_NIGHT: u32 = 0x0a0015;         // Clear colour and fog

pub const CONFETTI_PALETTE: [u32; 7] = [
    COLOR_DEEP_PINK,
    COLOR_HOT_PINK,
    COLOR_PINK,
    COLOR_RUBY,
    COLOR_LIGHT_PINK,
    COLOR_GOLD,
    COLOR_ORANGE_RED,
];

// ===== CONFETTI =====

pub const CONFETTI_DEFAULT_COUNT: usize = 50;
pub const CONFETTI_BURST_COUNT: usize = 80;     // Count used by the burst sequence
pub const CONFETTI_RADIAL_SPEED_MIN: f32 = 0.2;
pub const CONFETTI_RADIAL_SPEED_MAX: f32 = 0.5;
pub const CONFETTI_VERTICAL_SPEED_MIN: f32 = 0.3;
pub const CONFETTI_VERTICAL_SPEED_MAX: f32 = 0.8;
pub const CONFETTI_GRAVITY: f32 = 0.01;
pub const CONFETTI_MAX_SPIN: f32 = 0.15;
pub const CONFETTI_DECAY_RATE: f32 = 0.01;
pub const CONFETTI_SIZE: [f32; 3] = [0.1, 0.2, 0.02];
pub const CONFETTI_EMISSIVE_INTENSITY: f32 = 0.3;

// ===== FIREWORK =====

pub const FIREWORK_POINTS_MIN: usize = 100;
pub const FIREWORK_POINTS_MAX: usize = 120;
pub const FIREWORK_SPEED_MIN: f32 = 0.1;
pub const FIREWORK_SPEED_MAX: f32 = 0.25;
pub const FIREWORK_GRAVITY: f32 = 0.003;
pub const FIREWORK_DECAY_RATE: f32 = 0.012;

// ===== BLAST RING =====

pub const BLAST_RING_MAX_SCALE: f32 = 8.0;
pub const BLAST_RING_DECAY_RATE: f32 = 0.02;
pub const BLAST_RING_OPACITY: f32 = 0.8;
pub const BLAST_RING_MAJOR_RADIUS: f32 = 0.1;
pub const BLAST_RING_MINOR_RADIUS: f32 = 0.05;

// ===== HEART BURST =====

pub const HEART_BURST_COUNT: usize = 12;
pub const HEART_BURST_RADIAL_SPEED: f32 = 0.15;
pub const HEART_BURST_VERTICAL_SPEED_MAX: f32 = 0.2;
pub const HEART_BURST_GRAVITY: f32 = 0.008;
pub const HEART_BURST_MAX_SPIN: f32 = 0.1;
pub const HEART_BURST_DECAY_RATE: f32 = 0.015;
pub const HEART_BURST_OPACITY: f32 = 0.9;
pub const HEART_BURST_SCALE: f32 = 0.15;
pub const HEART_BURST_DEPTH: f32 = 0.1;
pub const HEART_BURST_EMISSIVE_INTENSITY: f32 = 0.5;

// ===== AMBIENT FIELD =====

pub const AMBIENT_PARTICLE_COUNT: usize = 1500;
pub const AMBIENT_HALF_EXTENT: f32 = 15.0;
pub const AMBIENT_DRIFT_MAX: f32 = 0.01;        // |vx|, |vz| upper bound
pub const AMBIENT_RISE_MIN: f32 = 0.005;
pub const AMBIENT_RISE_MAX: f32 = 0.015;
pub const AMBIENT_OPACITY: f32 = 0.6;
pub const AMBIENT_CHUNK_SIZE: usize = 256;      // Particles per parallel work unit and RNG stream

// ===== FLOATING DECORATIONS =====

pub const FLOATING_HEART_COUNT: usize = 5;
pub const FLOATING_HEART_DEPTH: f32 = 0.3;
pub const FLOATING_HEART_OPACITY: f32 = 0.9;
pub const FLOATING_HEART_EMISSIVE_INTENSITY: f32 = 0.3;
pub const FLOATING_AREA_HALF_EXTENTS: [f32; 3] = [7.5, 5.0, 5.0];
pub const FLOATING_SCALE_MIN: f32 = 0.5;
pub const FLOATING_SCALE_MAX: f32 = 1.0;
pub const FLOATING_DEPTH_SCALE: f32 = 0.5;
pub const FLOATING_MAX_SPIN: f32 = 0.01;
pub const FLOATING_SPEED_MIN: f32 = 0.5;
pub const FLOATING_SPEED_MAX: f32 = 1.0;
pub const FLOATING_AMPLITUDE: f32 = 0.5;
pub const FLOATING_PULSE_SPEED_MIN: f32 = 1.0;
pub const FLOATING_PULSE_SPEED_MAX: f32 = 2.0;
pub const FLOATING_PULSE_DEPTH: f32 = 0.15;     // Scale swing as a fraction of base scale

pub const CENTRAL_HEART_DEPTH: f32 = 0.5;
pub const CENTRAL_HEART_SCALE: f32 = 1.2;
pub const CENTRAL_HEART_SPIN_SPEED: f32 = 0.5;
pub const CENTRAL_HEART_SWAY: f32 = 0.1;
pub const CENTRAL_HEART_FLOAT_SPEED: f32 = 2.0;
pub const CENTRAL_HEART_FLOAT_AMPLITUDE: f32 = 0.3;
pub const CENTRAL_HEART_PULSE_SPEED: f32 = 3.0;
pub const CENTRAL_HEART_PULSE_DEPTH: f32 = 0.1 / 1.2;
pub const CENTRAL_HEART_OPACITY: f32 = 0.95;
pub const CENTRAL_HEART_EMISSIVE_INTENSITY: f32 = 0.5;

// ===== EXPLOSION SCHEDULER =====

pub const EXPLOSION_INTERVAL_SECS: f32 = 0.8;
pub const EXPLOSION_PROBABILITY: f32 = 0.7;
pub const EXPLOSION_BOUNDS: [f32; 3] = [6.0, 4.0, 4.0];   // Half-extents of the random spawn box

pub const BURST_REPEAT_COUNT: usize = 5;
pub const BURST_STAGGER_SECS: f32 = 0.1;
pub const BURST_BOUNDS: [f32; 3] = [5.0, 3.0, 3.0];
pub const BURST_SHAKE_INTENSITY: f32 = 0.3;

// ===== CAMERA =====

pub const CAMERA_DISTANCE: f32 = 8.0;
pub const CAMERA_FOV_DEGREES: f32 = 75.0;
pub const CAMERA_LERP_FACTOR: f32 = 0.05;
pub const CAMERA_POINTER_GAIN: f32 = 2.0;
pub const SHAKE_DECAY: f32 = 0.9;
pub const SHAKE_FLOOR: f32 = 0.001;             // Shake snaps to zero below this

// ===== LIGHTING =====

pub const FOG_START: f32 = 5.0;
pub const FOG_END: f32 = 25.0;
pub const AMBIENT_LIGHT_BRIGHTNESS: f32 = 250.0;
pub const ORBIT_LIGHT_RADIUS: f32 = 8.0;
pub const ORBIT_LIGHT_A_SPEED: f32 = 0.7;
pub const ORBIT_LIGHT_B_SPEED: f32 = 0.5;
pub const ORBIT_LIGHT_A_HEIGHT: f32 = 5.0;
pub const ORBIT_LIGHT_B_HEIGHT: f32 = -5.0;
pub const ORBIT_LIGHT_A_INTENSITY: f32 = 400_000.0;
pub const ORBIT_LIGHT_B_INTENSITY: f32 = 300_000.0;
pub const ORBIT_LIGHT_RANGE: f32 = 20.0;
