pub mod shared {
    pub mod color;
    pub mod constants;
    pub mod frame;
    pub mod image_codec;
    pub mod region;
    pub mod settings;

    #[cfg(test)]
    pub(crate) mod test_support;
}

pub mod detection {
    pub mod domain {
        pub mod face_landmarks;
        pub mod face_region_extractor;
        pub mod landmark_detector;
        pub mod region_mask;
    }
    pub mod infrastructure;
}

pub mod scoring {
    pub mod confidence_engine;
    pub mod pixel_statistics;
    pub mod skin_scores;
    pub mod skin_scoring_engine;
}

pub mod recommendation {
    pub mod domain {
        pub mod recommendation_engine;
        pub mod rule_table;
        pub mod service_recommendation;
    }
    pub mod infrastructure;
}

pub mod simulation {
    pub mod domain {
        pub mod correction_cap;
        pub mod service_simulator;
    }
    pub mod infrastructure;
    pub mod simulation_engine;
}

pub mod pipeline {
    pub mod consult_customer_use_case;
    pub mod consult_staff_use_case;
    pub mod consult_use_case;
    pub mod consultation_logger;
    pub mod error;
    pub mod report;
}
