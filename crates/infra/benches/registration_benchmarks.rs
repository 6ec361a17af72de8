use std::sync::Arc;

use campus_core::{CourseId, PersonId};
use campus_courses::{Course, NewCourse};
use campus_infra::{EntityStore, InMemoryEntityStore, Registrar};
use campus_people::{NewPerson, Person};
use campus_registrations::{NewRegistration, Registration, RegistrationPatch, RegistrationStatus};
use chrono::Utc;
use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};

type BenchRegistrar = Registrar<
    Arc<InMemoryEntityStore<Person>>,
    Arc<InMemoryEntityStore<Course>>,
    Arc<InMemoryEntityStore<Registration>>,
>;

fn setup(capacity: u32, people: usize) -> (BenchRegistrar, CourseId, Vec<PersonId>) {
    let registrar = Registrar::new(
        Arc::new(InMemoryEntityStore::new()),
        Arc::new(InMemoryEntityStore::new()),
        Arc::new(InMemoryEntityStore::new()),
    );
    let course = Course::create(
        NewCourse {
            course_number: "COMS4153".to_string(),
            instructor: "Donald F Ferguson".to_string(),
            time: "F 1:10pm-3:40pm".to_string(),
            location: "501 Northwest Corner Building".to_string(),
            capacity,
        },
        Utc::now(),
    )
    .unwrap();
    let course_id = course.id;
    registrar.courses().put(course);

    let ids = (0..people)
        .map(|i| {
            let p = Person::create(
                NewPerson {
                    uni: format!("bn{}", i % 10_000),
                    first_name: "Bench".to_string(),
                    last_name: format!("Student{i}"),
                    email: format!("bench{i}@example.edu"),
                    phone: None,
                    birth_date: None,
                    addresses: vec![],
                },
                Utc::now(),
            )
            .unwrap();
            let id = p.id;
            registrar.persons().put(p);
            id
        })
        .collect();
    (registrar, course_id, ids)
}

/// Latency of a single create when seats are free vs. when the course is full.
fn bench_create_registration(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_registration");

    for (label, capacity) in [("enrolled", u32::MAX), ("waitlisted", 0)] {
        let (registrar, course_id, people) = setup(capacity, 1);
        group.bench_function(label, |b| {
            b.iter(|| {
                let new = black_box(NewRegistration::new(people[0], course_id));
                registrar.create_registration(new).unwrap()
            })
        });
    }

    group.finish();
}

/// Drop + waitlist promotion cost as the registration table grows.
///
/// Promotion scans every registration, so this should grow linearly.
fn bench_drop_with_promotion(c: &mut Criterion) {
    let mut group = c.benchmark_group("drop_with_promotion");

    for waitlist in [10usize, 100, 1_000] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(waitlist), &waitlist, |b, &waitlist| {
            b.iter_batched(
                || {
                    let (registrar, course_id, people) = setup(1, waitlist + 1);
                    let holder = registrar
                        .create_registration(NewRegistration::new(people[0], course_id))
                        .unwrap();
                    for &person_id in &people[1..] {
                        registrar
                            .create_registration(NewRegistration::new(person_id, course_id))
                            .unwrap();
                    }
                    (registrar, holder.id)
                },
                |(registrar, holder)| {
                    let dropped = RegistrationPatch::with_status(RegistrationStatus::Dropped);
                    registrar.update_registration(holder, dropped).unwrap()
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_create_registration,
    bench_drop_with_promotion
);
criterion_main!(benches);
