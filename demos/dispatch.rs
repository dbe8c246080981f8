use sovran_polyset::{natural_by_ord, type_list, PolySet, PtrUnion, UnionError};

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Circle {
    radius: u32,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Square {
    side: u32,
}

natural_by_ord!(Circle, Square);

type Shapes = type_list![Circle, Square, String];

const CIRCLE: u8 = PtrUnion::<Shapes>::id_of::<Circle, _>();
const SQUARE: u8 = PtrUnion::<Shapes>::id_of::<Square, _>();
const LABEL: u8 = PtrUnion::<Shapes>::id_of::<String, _>();

fn area(handle: PtrUnion<'_, Shapes>) -> Result<f64, UnionError> {
    match handle.id() {
        CIRCLE => {
            let circle = handle.downcast::<Circle, _>()?;
            Ok(std::f64::consts::PI * f64::from(circle.radius).powi(2))
        }
        SQUARE => {
            let square = handle.downcast::<Square, _>()?;
            Ok(f64::from(square.side).powi(2))
        }
        _ => Ok(0.0),
    }
}

fn main() -> Result<(), UnionError> {
    let mut shapes = PolySet::<Shapes>::new();
    shapes.insert(Circle { radius: 1 });
    shapes.insert(Circle { radius: 2 });
    shapes.insert(Square { side: 3 });
    shapes.insert("drawing".to_string());

    // Inserting an equal value keeps the element already stored
    let (_, fresh) = shapes.insert(Square { side: 3 });
    println!("Second 3x3 square inserted: {}", fresh);

    let mut total = 0.0;
    for handle in shapes.handles() {
        match handle.id() {
            LABEL => println!("Label: {}", handle.downcast::<String, _>()?),
            _ => {
                let a = area(handle)?;
                println!("{:?} has area {:.2}", handle.type_name(), a);
                total += a;
            }
        }
    }
    println!("{} shapes, total area {:.2}", shapes.len(), total);

    // A miss looks the same whichever store was searched
    let missing = shapes.find(&Circle { radius: 9 });
    match missing.downcast::<Circle, _>() {
        Ok(circle) => println!("Found {:?}", circle),
        Err(e) => println!("Lookup failed: {}", e),
    }

    Ok(())
}
