use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chanbus::{BoxError, Claim, Host, LazySingleton, SingletonError, SingletonState};

#[derive(Debug)]
struct Music {
    track: &'static str,
}

/// Scene graph stand-in: keeps live instances and runs the creation hook on
/// construct like an engine's `Awake`.
struct Scene {
    singleton: &'static LazySingleton<Music>,
    live: Mutex<Vec<(String, Arc<Music>)>>,
    persistent: AtomicUsize,
}

impl Scene {
    fn new(singleton: &'static LazySingleton<Music>) -> Self {
        Self {
            singleton,
            live: Mutex::new(Vec::new()),
            persistent: AtomicUsize::new(0),
        }
    }

    fn spawn(&self, track: &'static str) -> (Arc<Music>, Claim) {
        let music = Arc::new(Music { track });
        self.live
            .lock()
            .unwrap()
            .push(("Music".to_owned(), Arc::clone(&music)));
        let claim = self.singleton.on_create(self, &music);
        (music, claim)
    }

    fn live_count(&self) -> usize {
        self.live.lock().unwrap().len()
    }

    fn containers(&self) -> Vec<String> {
        self.live.lock().unwrap().iter().map(|(n, _)| n.clone()).collect()
    }
}

impl Host<Music> for Scene {
    fn find_existing(&self) -> Option<Arc<Music>> {
        self.live.lock().unwrap().first().map(|(_, m)| Arc::clone(m))
    }

    fn construct(&self, container: &str) -> Result<Arc<Music>, BoxError> {
        let music = Arc::new(Music { track: "default" });
        self.live
            .lock()
            .unwrap()
            .push((container.to_owned(), Arc::clone(&music)));
        // Re-enters the singleton while `instance()` is in progress.
        let _ = self.singleton.on_create(self, &music);
        Ok(music)
    }

    fn destroy(&self, instance: &Arc<Music>) {
        self.live
            .lock()
            .unwrap()
            .retain(|(_, m)| !Arc::ptr_eq(m, instance));
    }

    fn make_persistent(&self, _instance: &Arc<Music>) {
        self.persistent.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn first_access_constructs_named_container() {
    static MUSIC: LazySingleton<Music> = LazySingleton::new();
    let scene = Scene::new(&MUSIC);

    let a = MUSIC.instance(&scene).unwrap();
    let b = MUSIC.instance(&scene).unwrap();

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.track, "default");
    assert_eq!(scene.containers(), vec!["Music (Singleton)"]);
    assert_eq!(scene.persistent.load(Ordering::SeqCst), 1);
    assert_eq!(MUSIC.state(), SingletonState::Set);
}

#[test]
fn existing_scene_instance_is_adopted() {
    static MUSIC: LazySingleton<Music> = LazySingleton::new();
    let scene = Scene::new(&MUSIC);
    scene
        .live
        .lock()
        .unwrap()
        .push(("Music".to_owned(), Arc::new(Music { track: "placed" })));

    let got = MUSIC.instance(&scene).unwrap();
    assert_eq!(got.track, "placed");
    assert_eq!(scene.live_count(), 1);
    assert_eq!(scene.persistent.load(Ordering::SeqCst), 1);

    // The placed object's own creation hook runs later and must not re-persist.
    assert_eq!(MUSIC.on_create(&scene, &got), Claim::Claimed);
    assert_eq!(scene.persistent.load(Ordering::SeqCst), 1);
}

#[test]
fn second_spawn_is_destroyed() {
    static MUSIC: LazySingleton<Music> = LazySingleton::new();
    let scene = Scene::new(&MUSIC);

    let (first, c1) = scene.spawn("menu");
    let (_second, c2) = scene.spawn("battle");

    assert_eq!(c1, Claim::Claimed);
    assert_eq!(c2, Claim::Duplicate);
    assert_eq!(scene.live_count(), 1);
    assert!(Arc::ptr_eq(&MUSIC.instance(&scene).unwrap(), &first));
}

#[test]
fn teardown_keeps_last_instance_and_blocks_creation() {
    static MUSIC: LazySingleton<Music> = LazySingleton::new();
    let scene = Scene::new(&MUSIC);
    let (first, _) = scene.spawn("menu");

    MUSIC.on_teardown_begin();
    let (_, late) = scene.spawn("late");
    assert_eq!(late, Claim::Duplicate);

    let got = MUSIC.instance(&scene).unwrap();
    assert!(Arc::ptr_eq(&got, &first));
    assert_eq!(MUSIC.state(), SingletonState::Frozen);
}

#[test]
fn teardown_before_first_access_never_constructs() {
    static MUSIC: LazySingleton<Music> = LazySingleton::new();
    let scene = Scene::new(&MUSIC);

    MUSIC.on_teardown_begin();
    let err = MUSIC.instance(&scene).unwrap_err();

    assert!(matches!(err, SingletonError::TearingDown { type_name: "Music" }));
    assert_eq!(scene.live_count(), 0);
    assert!(MUSIC.peek().is_none());
}

#[test]
fn concurrent_first_access_yields_one_instance() {
    static MUSIC: LazySingleton<Music> = LazySingleton::new();
    let scene = Arc::new(Scene::new(&MUSIC));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let scene = Arc::clone(&scene);
            std::thread::spawn(move || MUSIC.instance(&*scene).unwrap())
        })
        .collect();
    let got: Vec<Arc<Music>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let winner = MUSIC.peek().unwrap();
    assert!(got.iter().all(|m| Arc::ptr_eq(m, &winner)));
    assert_eq!(scene.live_count(), 1);
    assert_eq!(scene.persistent.load(Ordering::SeqCst), 1);
}

/// What a [`Meddler`] does from inside `construct`.
#[derive(Clone, Copy)]
enum Interference {
    /// Another instance wins the slot before the built one is reported.
    RivalClaims,
    /// Application shutdown starts while the instance is being built.
    Teardown,
}

/// Host whose `construct` races the singleton deterministically.
struct Meddler {
    singleton: &'static LazySingleton<Music>,
    interference: Interference,
    rival: Mutex<Option<Arc<Music>>>,
    built: Mutex<Option<Arc<Music>>>,
    destroyed: Mutex<Vec<&'static str>>,
    persistent: AtomicUsize,
}

impl Meddler {
    fn new(singleton: &'static LazySingleton<Music>, interference: Interference) -> Self {
        Self {
            singleton,
            interference,
            rival: Mutex::new(None),
            built: Mutex::new(None),
            destroyed: Mutex::new(Vec::new()),
            persistent: AtomicUsize::new(0),
        }
    }
}

impl Host<Music> for Meddler {
    fn find_existing(&self) -> Option<Arc<Music>> {
        None
    }

    fn construct(&self, _container: &str) -> Result<Arc<Music>, BoxError> {
        match self.interference {
            Interference::RivalClaims => {
                let rival = Arc::new(Music { track: "rival" });
                assert_eq!(self.singleton.on_create(self, &rival), Claim::Claimed);
                *self.rival.lock().unwrap() = Some(rival);
            }
            Interference::Teardown => self.singleton.on_teardown_begin(),
        }
        let built = Arc::new(Music { track: "built" });
        *self.built.lock().unwrap() = Some(Arc::clone(&built));
        Ok(built)
    }

    fn destroy(&self, instance: &Arc<Music>) {
        self.destroyed.lock().unwrap().push(instance.track);
    }

    fn make_persistent(&self, _instance: &Arc<Music>) {
        self.persistent.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn instance_built_after_rival_claimed_is_destroyed() {
    static MUSIC: LazySingleton<Music> = LazySingleton::new();
    let host = Meddler::new(&MUSIC, Interference::RivalClaims);

    let got = MUSIC.instance(&host).unwrap();

    let rival = host.rival.lock().unwrap().clone().unwrap();
    assert!(Arc::ptr_eq(&got, &rival));
    assert_eq!(*host.destroyed.lock().unwrap(), vec!["built"]);
    assert_eq!(host.persistent.load(Ordering::SeqCst), 1);
    assert_eq!(MUSIC.state(), SingletonState::Set);
}

#[test]
fn instance_built_while_teardown_began_is_left_unclaimed() {
    static MUSIC: LazySingleton<Music> = LazySingleton::new();
    let host = Meddler::new(&MUSIC, Interference::Teardown);

    let got = MUSIC.instance(&host).unwrap();

    let built = host.built.lock().unwrap().clone().unwrap();
    assert!(Arc::ptr_eq(&got, &built));
    assert!(host.destroyed.lock().unwrap().is_empty());
    assert_eq!(host.persistent.load(Ordering::SeqCst), 0);
    assert_eq!(MUSIC.state(), SingletonState::Frozen);
    assert!(MUSIC.peek().is_none());
}
