use narralign::sync::{build_sync_map, AlignmentParams, AudioTrack, TextTrack};
use ndarray::Array2;

fn ramp_features(start: usize, len: usize) -> Array2<f64> {
    let data: Vec<f64> = (0..len).map(|i| (start + i) as f64).collect();
    Array2::from_shape_vec((len, 1), data).unwrap()
}

fn constant_features(value: f64, len: usize) -> Array2<f64> {
    Array2::from_shape_vec((len, 1), vec![value; len]).unwrap()
}

fn queue<T: 'static>(tracks: Vec<T>) -> impl FnMut() -> Option<anyhow::Result<T>> {
    let mut iter = tracks.into_iter();
    move || iter.next().map(Ok)
}

fn text_track(name: &str, first_fragment: usize, features: Array2<f64>, anchors: Vec<usize>) -> TextTrack {
    let fragments = (0..anchors.len())
        .map(|k| format!("f{:04}", first_fragment + k))
        .collect();
    TextTrack {
        name: name.to_string(),
        fragments,
        anchors,
        features,
    }
}

#[test]
fn three_texts_map_cleanly_onto_three_audios() {
    let texts = vec![
        text_track("p001.xhtml", 1, ramp_features(0, 300), vec![0, 100, 200]),
        text_track("p002.xhtml", 1, ramp_features(1000, 300), vec![0, 100, 200]),
        text_track("p003.xhtml", 1, ramp_features(2000, 300), vec![0, 100, 200]),
    ];
    let audios = vec![
        AudioTrack {
            name: "audio1.mp3".to_string(),
            features: ramp_features(0, 300),
        },
        AudioTrack {
            name: "audio2.mp3".to_string(),
            features: ramp_features(1000, 300),
        },
        AudioTrack {
            name: "audio3.mp3".to_string(),
            features: ramp_features(2000, 300),
        },
    ];

    let map = build_sync_map(queue(texts), queue(audios), AlignmentParams::default()).unwrap();

    assert_eq!(map.len(), 3);
    let audio_names = ["audio1.mp3", "audio2.mp3", "audio3.mp3"];
    for (index, text_name) in ["p001.xhtml", "p002.xhtml", "p003.xhtml"].iter().enumerate() {
        let fragments = map.get(text_name).unwrap();
        assert_eq!(fragments.len(), 3);
        let mut previous_begin = 0.0;
        for timing in fragments.values() {
            assert_eq!(timing.audio_file, audio_names[index]);
            assert!(timing.begin < timing.end);
            assert!(timing.begin >= previous_begin);
            previous_begin = timing.begin;
        }
    }
}

#[test]
fn extra_text_head_is_skipped_or_pinned_to_the_start() {
    // Five fragments of front matter that no audio narrates, then the body.
    let mut head = vec![10_000.0; 75];
    for (i, value) in head.iter_mut().enumerate() {
        *value += i as f64;
    }
    let body: Vec<f64> = (0..300).map(|i| i as f64).collect();
    let features =
        Array2::from_shape_vec((375, 1), head.into_iter().chain(body).collect()).unwrap();
    let text = text_track(
        "p001.xhtml",
        1,
        features,
        vec![0, 15, 30, 45, 60, 75, 175, 275],
    );
    let audio = AudioTrack {
        name: "audio1.mp3".to_string(),
        features: ramp_features(0, 300),
    };

    let map = build_sync_map(queue(vec![text]), queue(vec![audio]), AlignmentParams::default())
        .unwrap();

    let fragments = map.get("p001.xhtml").unwrap();
    // The last front-matter fragment is either unmapped or squeezed into the
    // opening instants of the audio.
    match fragments.get("f0005") {
        None => {}
        Some(timing) => assert!(timing.end < 3.0),
    }
    // The body maps normally.
    let body_start = fragments.get("f0006").unwrap();
    assert!(body_start.begin < 0.5);
    assert!(fragments.get("f0008").unwrap().end > body_start.begin);
}

#[test]
fn one_text_spanning_two_audio_files_is_stitched_across_them() {
    let text = text_track(
        "book.xhtml",
        1,
        ramp_features(0, 600),
        vec![0, 100, 200, 300, 400, 500],
    );
    let audios = vec![
        AudioTrack {
            name: "part1.mp3".to_string(),
            features: ramp_features(0, 300),
        },
        AudioTrack {
            name: "part2.mp3".to_string(),
            features: ramp_features(300, 300),
        },
    ];

    let map = build_sync_map(queue(vec![text]), queue(audios), AlignmentParams::default()).unwrap();

    let fragments = map.get("book.xhtml").unwrap();
    assert_eq!(fragments.len(), 6);
    for id in ["f0001", "f0002", "f0003"] {
        assert_eq!(fragments.get(id).unwrap().audio_file, "part1.mp3");
    }
    for id in ["f0004", "f0005", "f0006"] {
        assert_eq!(fragments.get(id).unwrap().audio_file, "part2.mp3");
    }
    // The second audio file restarts its clock.
    assert!(fragments.get("f0004").unwrap().begin < 1.0);
}

#[test]
fn a_hopeless_pairing_abandons_the_whole_run() {
    let text = text_track("p001.xhtml", 1, ramp_features(0, 50), vec![0, 25]);
    let audio = AudioTrack {
        name: "audio1.mp3".to_string(),
        features: constant_features(10_000.0, 50),
    };
    let params = AlignmentParams {
        skip_penalty: 0.0,
        radius: 10,
    };

    let map = build_sync_map(queue(vec![text]), queue(vec![audio]), params).unwrap();
    assert!(map.is_empty());
}

#[test]
fn mismatched_feature_widths_surface_as_an_error() {
    let text = TextTrack {
        name: "p001.xhtml".to_string(),
        fragments: vec!["f0001".to_string()],
        anchors: vec![0],
        features: Array2::zeros((10, 2)),
    };
    let audio = AudioTrack {
        name: "audio1.mp3".to_string(),
        features: Array2::zeros((10, 1)),
    };

    let result = build_sync_map(
        queue(vec![text]),
        queue(vec![audio]),
        AlignmentParams::default(),
    );
    assert!(result.is_err());
}

#[test]
fn leftover_audio_is_offered_to_the_next_text_file() {
    // One audio file narrating two text files back to back.
    let texts = vec![
        text_track("p001.xhtml", 1, ramp_features(0, 250), vec![0, 120]),
        text_track("p002.xhtml", 1, ramp_features(249, 251), vec![0, 120]),
    ];
    let audio = AudioTrack {
        name: "audio.mp3".to_string(),
        features: ramp_features(0, 500),
    };

    let map = build_sync_map(queue(texts), queue(vec![audio]), AlignmentParams::default()).unwrap();

    assert_eq!(map.len(), 2);
    let first = map.get("p001.xhtml").unwrap();
    let second = map.get("p002.xhtml").unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
    // Times in the second text continue on the same audio clock.
    let tail_begin = second.get("f0001").unwrap().begin;
    let head_end = first.get("f0002").unwrap().end;
    assert!(tail_begin >= head_end - 1.0);
    assert!(second.get("f0002").unwrap().end > 15.0);
}
